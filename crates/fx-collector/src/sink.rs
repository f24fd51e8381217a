//! 정규화된 환율 레코드 출력 대상.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fx_core::NormalizedRate;
use tokio::io::AsyncWriteExt;

use crate::Result;

/// 환율 레코드 출력 대상.
#[async_trait]
pub trait RateSink: Send + Sync {
    /// 레코드를 기록하고 기록한 건수를 반환합니다.
    async fn write(&self, rates: &[NormalizedRate]) -> Result<usize>;

    /// 로그용 설명.
    fn describe(&self) -> String;
}

/// 한 줄에 JSON 문서 하나씩 파일 끝에 덧붙이는 출력 대상.
///
/// 기존 내용은 다시 쓰지 않습니다.
#[derive(Debug, Clone)]
pub struct JsonLinesSink {
    path: PathBuf,
}

impl JsonLinesSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RateSink for JsonLinesSink {
    async fn write(&self, rates: &[NormalizedRate]) -> Result<usize> {
        if rates.is_empty() {
            return Ok(0);
        }

        let mut buf = String::new();
        for rate in rates {
            buf.push_str(&serde_json::to_string(rate)?);
            buf.push('\n');
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(buf.as_bytes()).await?;
        file.flush().await?;

        tracing::debug!(path = %self.path.display(), count = rates.len(), "JSON Lines 기록");
        Ok(rates.len())
    }

    fn describe(&self) -> String {
        format!("jsonl:{}", self.path.display())
    }
}

/// 표준 출력으로 pretty JSON 배열을 출력합니다.
#[derive(Debug, Clone, Default)]
pub struct StdoutSink;

#[async_trait]
impl RateSink for StdoutSink {
    async fn write(&self, rates: &[NormalizedRate]) -> Result<usize> {
        let json = serde_json::to_string_pretty(rates)?;
        let mut stdout = tokio::io::stdout();
        stdout.write_all(json.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
        Ok(rates.len())
    }

    fn describe(&self) -> String {
        "stdout".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use fx_core::{CurrencyName, Quote, RateTable, ValidatedRate};

    fn rate(code: &str) -> NormalizedRate {
        let validated = ValidatedRate {
            currency: CurrencyName::new(code, "測試"),
            rates: RateTable {
                cash: Quote::new(Some(1.0), Some(1.1)),
                spot: Quote::new(None, None),
            },
            timestamp: Utc::now(),
        };
        NormalizedRate::from_validated("Bank of Taiwan", &validated)
    }

    #[tokio::test]
    async fn test_json_lines_sink_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("rates.jsonl");
        let sink = JsonLinesSink::new(&path);
        assert_eq!(sink.path(), path.as_path());
        assert_eq!(sink.describe(), format!("jsonl:{}", path.display()));

        assert_eq!(sink.write(&[rate("USD"), rate("JPY")]).await.unwrap(), 2);
        assert_eq!(sink.write(&[rate("EUR")]).await.unwrap(), 1);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);

        let last: NormalizedRate = serde_json::from_str(lines[2]).unwrap();
        assert_eq!(last.currency_en, "EUR");
        assert_eq!(last.cash_buy, Some(1.0));
        assert_eq!(last.spot_sell, None);
    }

    #[tokio::test]
    async fn test_json_lines_sink_skips_empty_batch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rates.jsonl");
        let sink = JsonLinesSink::new(&path);

        assert_eq!(sink.write(&[]).await.unwrap(), 0);
        assert!(!path.exists());
    }
}
