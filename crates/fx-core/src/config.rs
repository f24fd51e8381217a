//! 설정 관리.
//!
//! 기관별 소스 디스크립터(URL, 헤더, 문자 인코딩)와 애플리케이션 설정을 정의합니다.
//! 로드 순서는 내장 기본값 → TOML 파일(선택) → `FX__` 환경 변수입니다.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// 기본 브라우저 User-Agent.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// 대만은행 소스 ID.
pub const BOT_SOURCE_ID: &str = "bot";
/// 중국신탁은행 소스 ID.
pub const CTBC_SOURCE_ID: &str = "ctbc";

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 스크래퍼 설정
    #[serde(default)]
    pub scraper: ScraperConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 출력 설정
    #[serde(default)]
    pub output: OutputConfig,
}

/// 스크래퍼 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScraperConfig {
    /// 소스 ID별 디스크립터
    pub sources: BTreeMap<String, SourceConfig>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        let mut sources = BTreeMap::new();
        sources.insert(BOT_SOURCE_ID.to_string(), SourceConfig::bank_of_taiwan());
        sources.insert(CTBC_SOURCE_ID.to_string(), SourceConfig::ctbc());
        Self { sources }
    }
}

impl ScraperConfig {
    /// 소스 디스크립터 조회.
    pub fn source(&self, id: &str) -> Option<&SourceConfig> {
        self.sources.get(id)
    }

    /// 모든 디스크립터를 검증합니다.
    pub fn validate(&self) -> CoreResult<()> {
        for (id, source) in &self.sources {
            source.validate(id)?;
        }
        Ok(())
    }
}

/// 기관별 소스 디스크립터.
///
/// 일부 은행은 기본 헤더를 거부하거나 Referer/Accept-Language 같은 헤더를 요구하므로
/// 헤더 집합은 소스마다 명시합니다. 응답 인코딩도 자동 감지하지 않고 명시합니다.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourceConfig {
    /// 기관명 (예: "Bank of Taiwan")
    pub name: String,
    /// 환율 페이지 URL
    pub url: String,
    /// 요청 헤더
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// 응답 문자 인코딩 라벨 (WHATWG, 예: "utf-8", "big5")
    #[serde(default = "default_encoding")]
    pub encoding: String,
    /// 요청 타임아웃 (초)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl SourceConfig {
    /// 새 디스크립터를 생성합니다 (기본 User-Agent 포함).
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("User-Agent".to_string(), DEFAULT_USER_AGENT.to_string());

        Self {
            name: name.into(),
            url: url.into(),
            headers,
            encoding: default_encoding(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// 헤더를 추가합니다.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// 응답 인코딩을 설정합니다.
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// 대만은행 (Bank of Taiwan) 디스크립터.
    pub fn bank_of_taiwan() -> Self {
        Self::new("Bank of Taiwan", "https://rate.bot.com.tw/xrt?Lang=zh-TW")
    }

    /// 중국신탁은행 (CTBC Bank) 디스크립터.
    pub fn ctbc() -> Self {
        Self::new(
            "CTBC Bank",
            "https://www.ctbcbank.com/twrbo/zh_tw/dep_index/dep_ratequery/dep_foreign_rates.html",
        )
        .with_header(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        )
        .with_header("Accept-Language", "zh-TW,zh;q=0.9,en-US;q=0.8,en;q=0.7")
        .with_header("Connection", "keep-alive")
        .with_header("Referer", "https://www.ctbcbank.com/")
    }

    /// 요청 타임아웃을 Duration으로 반환
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// 인코딩 라벨을 `encoding_rs` 인코딩으로 해석합니다.
    pub fn resolve_encoding(&self) -> Option<&'static encoding_rs::Encoding> {
        encoding_rs::Encoding::for_label(self.encoding.trim().as_bytes())
    }

    /// 디스크립터를 검증합니다.
    pub fn validate(&self, id: &str) -> CoreResult<()> {
        let invalid = |reason: &str| CoreError::InvalidSource {
            source_id: id.to_string(),
            reason: reason.to_string(),
        };

        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(invalid("URL은 http(s)로 시작해야 합니다"));
        }
        if self.resolve_encoding().is_none() {
            return Err(invalid(&format!("알 수 없는 인코딩: {}", self.encoding)));
        }
        if self.timeout_secs == 0 {
            return Err(invalid("타임아웃은 0보다 커야 합니다"));
        }
        Ok(())
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 출력 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    /// JSON Lines 출력 파일 경로 (없으면 표준 출력)
    #[serde(default)]
    pub path: Option<String>,
}

impl AppConfig {
    /// 기본값, 파일(선택), 환경 변수 순으로 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let builder = config::Config::builder()
            // 내장 기본값으로 시작
            .add_source(config::Config::try_from(&AppConfig::default())?)
            // 파일이 있으면 덮어쓰기
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("FX")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.scraper.validate()?;
        Ok(config)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> CoreResult<Self> {
        Self::load("config/default.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sources() {
        let config = ScraperConfig::default();

        let bot = config.source(BOT_SOURCE_ID).unwrap();
        assert_eq!(bot.name, "Bank of Taiwan");
        assert_eq!(bot.url, "https://rate.bot.com.tw/xrt?Lang=zh-TW");
        assert_eq!(bot.headers.len(), 1);

        let ctbc = config.source(CTBC_SOURCE_ID).unwrap();
        assert_eq!(ctbc.name, "CTBC Bank");
        assert_eq!(ctbc.headers["Referer"], "https://www.ctbcbank.com/");
        assert!(ctbc.headers["Accept-Language"].starts_with("zh-TW"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_encoding() {
        let source = SourceConfig::bank_of_taiwan().with_encoding("klingon-8");
        let err = source.validate("bot").unwrap_err();
        assert!(err.to_string().contains("klingon-8"));
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let mut source = SourceConfig::ctbc();
        source.url = String::new();
        assert!(source.validate("ctbc").is_err());
    }

    #[test]
    fn test_resolve_big5() {
        let source = SourceConfig::bank_of_taiwan().with_encoding("big5");
        assert_eq!(source.resolve_encoding(), Some(encoding_rs::BIG5));
    }

    #[test]
    fn test_source_from_toml_uses_defaults() {
        let source: SourceConfig = toml::from_str(
            r#"
            name = "Test Bank"
            url = "https://example.com/rates"
            "#,
        )
        .unwrap();

        assert_eq!(source.encoding, "utf-8");
        assert_eq!(source.timeout(), Duration::from_secs(30));
        assert!(source.headers.is_empty());
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = AppConfig::load("does/not/exist.toml").unwrap();
        assert_eq!(config.logging.level, "info");
        assert!(config.scraper.source(BOT_SOURCE_ID).is_some());
        assert!(config.output.path.is_none());
    }
}
