//! 환율 수집 모듈.

use std::time::Instant;

use fx_core::NormalizedRate;
use fx_scraper::ScrapeOrchestrator;

use crate::error::CollectorError;
use crate::sink::RateSink;
use crate::{CollectionStats, CollectorConfig, Result};

/// 대상 기관의 환율을 수집해 정규화한 뒤 출력 대상에 기록합니다.
///
/// 기관별 실패는 로그와 통계에만 반영되고, 전체에서 한 건도 수집하지 못한 경우에만
/// `CollectorError::NoRates`를 반환합니다.
pub async fn collect_rates(
    orchestrator: &ScrapeOrchestrator,
    config: &CollectorConfig,
    sink: &dyn RateSink,
) -> Result<CollectionStats> {
    let start = Instant::now();
    let mut stats = CollectionStats::new();

    let targets: Vec<String> = if config.institutions.is_empty() {
        orchestrator
            .institutions()
            .into_iter()
            .map(str::to_string)
            .collect()
    } else {
        config.institutions.clone()
    };

    tracing::info!(institutions = ?targets, sink = %sink.describe(), "환율 수집 시작");

    let mut normalized: Vec<NormalizedRate> = Vec::new();
    for (id, result) in orchestrator.scrape_many(&targets).await {
        stats.institutions += 1;

        match result {
            Ok(rates) => {
                stats.succeeded += 1;
                let name = orchestrator
                    .institution_name(&id)
                    .or_else(|| config.scraper.source(&id).map(|s| s.name.clone()))
                    .unwrap_or_else(|| id.clone());

                tracing::info!(institution = %name, count = rates.len(), "기관 수집 완료");
                normalized.extend(
                    rates
                        .iter()
                        .map(|rate| NormalizedRate::from_validated(name.as_str(), rate)),
                );
            }
            Err(e) => {
                stats.failed += 1;
                tracing::warn!(
                    institution = %id,
                    stage = %e.stage(),
                    retryable = e.is_retryable(),
                    "기관 수집 실패, 다음 기관으로 진행"
                );
            }
        }
    }

    if normalized.is_empty() {
        stats.elapsed = start.elapsed();
        tracing::error!(failed = stats.failed, "저장할 환율이 없습니다");
        return Err(CollectorError::NoRates);
    }

    stats.rates = sink.write(&normalized).await?;
    stats.elapsed = start.elapsed();

    Ok(stats)
}
