//! 수집 통계 구조체.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 수집 실행 통계
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionStats {
    /// 시도한 기관 수
    pub institutions: usize,
    /// 성공한 기관 수
    pub succeeded: usize,
    /// 실패한 기관 수
    pub failed: usize,
    /// 저장된 환율 레코드 수
    pub rates: usize,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl CollectionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// 기관 성공률 (%)
    pub fn success_rate(&self) -> f64 {
        if self.institutions == 0 {
            0.0
        } else {
            (self.succeeded as f64 / self.institutions as f64) * 100.0
        }
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            institutions = self.institutions,
            succeeded = self.succeeded,
            failed = self.failed,
            rates = self.rates,
            success_rate = format!("{:.1}%", self.success_rate()),
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "수집 완료"
        );
    }
}
