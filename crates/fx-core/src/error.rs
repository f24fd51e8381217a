//! 핵심 설정 에러 타입.

use thiserror::Error;

/// 설정 관련 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 설정 파일/환경 변수 로드 실패
    #[error("설정 로드 실패: {0}")]
    Load(#[from] config::ConfigError),

    /// 소스 디스크립터가 잘못됨
    #[error("잘못된 소스 설정 '{source_id}': {reason}")]
    InvalidSource { source_id: String, reason: String },
}

/// 설정 작업을 위한 Result 타입.
pub type CoreResult<T> = Result<T, CoreError>;
