//! 스크래퍼 에러 타입.
//!
//! 단계별 분류:
//! - `FetchError`: 전송 실패 또는 HTTP 에러 상태
//! - `ParseError`: 환율 테이블을 찾지 못했거나 추출된 행이 없음
//! - `ScrapeError`: 호출자에게 노출되는 기관명 태그가 붙은 통합 에러

use thiserror::Error;

/// 원본 페이지 조회 에러.
#[derive(Debug, Error)]
pub enum FetchError {
    /// 연결, 타임아웃, DNS 등 전송 계층 실패
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// 4xx/5xx 응답
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// 응답 본문이 비어 있음
    #[error("Empty response body from {url}")]
    EmptyBody { url: String },

    /// 소스에 지정된 인코딩 라벨을 해석할 수 없음
    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),
}

/// 문서 구조 파싱 에러.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// 셀렉터 체인 중 어느 것도 환율 테이블을 찾지 못함
    #[error("Could not find exchange rate table")]
    TableNotFound,

    /// 테이블은 찾았지만 레코드를 하나도 만들지 못함
    #[error("No valid rates found in the page")]
    NoValidRates,

    /// CSS 셀렉터 문법 오류
    #[error("Invalid selector '{0}'")]
    Selector(String),
}

/// 실패한 파이프라인 단계.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeStage {
    Fetch,
    Parse,
    Validate,
    Other,
}

impl std::fmt::Display for ScrapeStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fetch => write!(f, "fetch"),
            Self::Parse => write!(f, "parse"),
            Self::Validate => write!(f, "validate"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// `scrape()`가 반환하는 에러. 항상 기관명을 포함합니다.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Failed to fetch data from {institution}: {source}")]
    Fetch {
        institution: String,
        #[source]
        source: FetchError,
    },

    #[error("Failed to parse rates from {institution}: {source}")]
    Parse {
        institution: String,
        #[source]
        source: ParseError,
    },

    #[error("No valid rates found from {institution} ({rejected} rejected)")]
    Validation { institution: String, rejected: usize },

    /// 위 세 단계로 분류되지 않는 예기치 못한 실패
    #[error("Failed to scrape {institution}: {message}")]
    Unexpected { institution: String, message: String },
}

impl ScrapeError {
    /// 에러가 발생한 기관명.
    pub fn institution(&self) -> &str {
        match self {
            Self::Fetch { institution, .. }
            | Self::Parse { institution, .. }
            | Self::Validation { institution, .. }
            | Self::Unexpected { institution, .. } => institution,
        }
    }

    /// 실패 단계.
    pub fn stage(&self) -> ScrapeStage {
        match self {
            Self::Fetch { .. } => ScrapeStage::Fetch,
            Self::Parse { .. } => ScrapeStage::Parse,
            Self::Validation { .. } => ScrapeStage::Validate,
            Self::Unexpected { .. } => ScrapeStage::Other,
        }
    }

    /// 외부 스케줄러가 재시도할 만한 에러인지 확인.
    ///
    /// 전송 실패와 5xx/429만 재시도 대상입니다.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Fetch {
                source: FetchError::Transport(_),
                ..
            } => true,
            Self::Fetch {
                source: FetchError::Status { status, .. },
                ..
            } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

/// 스크래핑 작업을 위한 Result 타입.
pub type ScrapeResult<T> = Result<T, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrape_error_carries_institution() {
        let err = ScrapeError::Parse {
            institution: "CTBC Bank".to_string(),
            source: ParseError::TableNotFound,
        };

        assert_eq!(err.institution(), "CTBC Bank");
        assert_eq!(err.stage(), ScrapeStage::Parse);
        assert_eq!(
            err.to_string(),
            "Failed to parse rates from CTBC Bank: Could not find exchange rate table"
        );
    }

    #[test]
    fn test_retryable() {
        let server_error = ScrapeError::Fetch {
            institution: "Bank of Taiwan".to_string(),
            source: FetchError::Status {
                url: "https://rate.bot.com.tw/xrt".to_string(),
                status: 503,
            },
        };
        assert!(server_error.is_retryable());

        let not_found = ScrapeError::Fetch {
            institution: "Bank of Taiwan".to_string(),
            source: FetchError::Status {
                url: "https://rate.bot.com.tw/xrt".to_string(),
                status: 404,
            },
        };
        assert!(!not_found.is_retryable());

        let validation = ScrapeError::Validation {
            institution: "Bank of Taiwan".to_string(),
            rejected: 3,
        };
        assert!(!validation.is_retryable());
        assert_eq!(validation.stage().to_string(), "validate");
    }
}
