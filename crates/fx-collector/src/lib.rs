//! Standalone FX rate collector.
//!
//! 이 crate는 은행 공시 환율을 한 번 수집해 저장하는 바이너리를 제공합니다:
//! - 기관별 스크래핑 (Bank of Taiwan, CTBC Bank)
//! - 기관명을 붙인 레코드 정규화
//! - JSON Lines 파일 또는 stdout 출력

pub mod config;
pub mod error;
pub mod modules;
pub mod sink;
pub mod stats;

pub use config::CollectorConfig;
pub use error::{CollectorError, Result};
pub use sink::{JsonLinesSink, RateSink, StdoutSink};
pub use stats::CollectionStats;
