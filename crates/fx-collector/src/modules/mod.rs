//! 수집 워크플로우 모듈.

pub mod collect_rates;

pub use collect_rates::collect_rates;
