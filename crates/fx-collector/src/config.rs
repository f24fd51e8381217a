//! 파일/환경 변수 기반 설정 모듈.

use std::path::{Path, PathBuf};

use fx_core::{AppConfig, LoggingConfig, ScraperConfig};

use crate::Result;

/// Collector 전체 설정
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// 스크래퍼 소스 설정
    pub scraper: ScraperConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// 수집 대상 기관 ID (비어 있으면 등록된 전체 기관)
    pub institutions: Vec<String>,
    /// JSON Lines 출력 경로 (없으면 stdout)
    pub output_path: Option<PathBuf>,
}

impl CollectorConfig {
    /// `.env`를 읽은 뒤 설정 파일과 `FX__*` 환경 변수에서 설정 로드
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let app = AppConfig::load(path)?;
        Ok(Self::from(app))
    }

    /// 쉼표로 구분된 기관 목록으로 대상 기관을 덮어씁니다 (예: "bot,ctbc").
    pub fn with_institutions(mut self, list: Option<&str>) -> Self {
        if let Some(list) = list {
            self.institutions = list
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect();
        }
        self
    }

    /// 출력 경로를 덮어씁니다.
    pub fn with_output(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.output_path = path;
        }
        self
    }
}

impl From<AppConfig> for CollectorConfig {
    fn from(app: AppConfig) -> Self {
        Self {
            scraper: app.scraper,
            logging: app.logging,
            institutions: Vec::new(),
            output_path: app.output.path.map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_institutions_parses_list() {
        let config = CollectorConfig::from(AppConfig::default())
            .with_institutions(Some(" BOT, ctbc ,,"));

        assert_eq!(config.institutions, vec!["bot", "ctbc"]);
    }

    #[test]
    fn test_with_output_keeps_file_setting_when_absent() {
        let mut app = AppConfig::default();
        app.output.path = Some("data/rates.jsonl".to_string());

        let config = CollectorConfig::from(app).with_output(None);
        assert_eq!(config.output_path, Some(PathBuf::from("data/rates.jsonl")));

        let config = config.with_output(Some(PathBuf::from("out.jsonl")));
        assert_eq!(config.output_path, Some(PathBuf::from("out.jsonl")));
    }
}
