//! 에러 타입 정의.

use std::fmt;

use fx_core::CoreError;
use fx_scraper::{FetchError, ScrapeError};

/// Collector 에러 타입
#[derive(Debug)]
pub enum CollectorError {
    /// 설정 에러
    Config(String),
    /// 스크래퍼 초기화 또는 스크래핑 에러
    Scrape(ScrapeError),
    /// 출력 파일 I/O 에러
    Io(std::io::Error),
    /// 직렬화 에러
    Serialization(serde_json::Error),
    /// 모든 기관에서 환율을 하나도 수집하지 못함
    NoRates,
}

impl fmt::Display for CollectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::Scrape(e) => write!(f, "Scrape error: {}", e),
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::Serialization(e) => write!(f, "Serialization error: {}", e),
            Self::NoRates => write!(f, "No rates available to save"),
        }
    }
}

impl std::error::Error for CollectorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Scrape(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Serialization(e) => Some(e),
            Self::Config(_) | Self::NoRates => None,
        }
    }
}

impl From<CoreError> for CollectorError {
    fn from(err: CoreError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<FetchError> for CollectorError {
    fn from(err: FetchError) -> Self {
        Self::Config(format!("HTTP 클라이언트 생성 실패: {}", err))
    }
}

impl From<ScrapeError> for CollectorError {
    fn from(err: ScrapeError) -> Self {
        Self::Scrape(err)
    }
}

impl From<std::io::Error> for CollectorError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for CollectorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err)
    }
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, CollectorError>;
