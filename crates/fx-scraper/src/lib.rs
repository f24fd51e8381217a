//! 은행 환율 스크래핑 파이프라인.
//!
//! 이 crate는 다음을 제공합니다:
//! - 소스별 헤더/인코딩을 적용한 페이지 조회 (`fetcher`)
//! - 기관별 환율 테이블 파서와 레지스트리 (`parser`, `registry`)
//! - 환율 셀 숫자 파싱 (`numeric`)
//! - 레코드 스키마 검증 (`validator`)
//! - 조회 → 파싱 → 검증 오케스트레이터 (`orchestrator`)

pub mod error;
pub mod fetcher;
pub mod numeric;
pub mod orchestrator;
pub mod parser;
pub mod registry;
pub mod validator;

pub use error::{FetchError, ParseError, ScrapeError, ScrapeResult, ScrapeStage};
pub use fetcher::{HttpFetcher, RateFetcher};
pub use orchestrator::ScrapeOrchestrator;
pub use parser::{BotParser, CtbcParser, RateParser, TableMatcher};
pub use registry::ParserRegistry;
