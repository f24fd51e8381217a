//! # FX Core
//!
//! 환율 스크래핑 시스템의 공통 도메인 모델과 설정을 제공합니다:
//! - 파이프라인 단계별 환율 레코드 (`RawRate`, `ValidatedRate`, `NormalizedRate`)
//! - 기관별 소스 디스크립터 및 애플리케이션 설정
//! - 로깅 인프라

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;
