//! 기관별 스크래핑 파이프라인.
//!
//! 조회 → 파싱 → 검증 → 수집 순서로 실행하며, 실패는 항상 기관명이 붙은
//! `ScrapeError`로 반환합니다. 호출 사이에 상태를 유지하지 않습니다.

use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use fx_core::{ScraperConfig, SourceConfig, ValidatedRate};
use tracing::Instrument;

use crate::error::{FetchError, ParseError, ScrapeError, ScrapeResult};
use crate::fetcher::{HttpFetcher, RateFetcher};
use crate::registry::ParserRegistry;
use crate::validator;

/// 스크래핑 오케스트레이터.
pub struct ScrapeOrchestrator {
    fetcher: Arc<dyn RateFetcher>,
    registry: ParserRegistry,
    sources: BTreeMap<String, SourceConfig>,
}

impl ScrapeOrchestrator {
    pub fn new(
        fetcher: Arc<dyn RateFetcher>,
        registry: ParserRegistry,
        config: &ScraperConfig,
    ) -> Self {
        Self {
            fetcher,
            registry,
            sources: config.sources.clone(),
        }
    }

    /// HTTP 조회기와 기본 파서로 생성합니다.
    pub fn with_defaults(config: &ScraperConfig) -> Result<Self, FetchError> {
        Ok(Self::new(
            Arc::new(HttpFetcher::new()?),
            ParserRegistry::with_defaults(),
            config,
        ))
    }

    /// 파서와 소스 설정이 모두 있는 기관 ID 목록.
    pub fn institutions(&self) -> Vec<&str> {
        self.registry
            .ids()
            .into_iter()
            .filter(|id| self.sources.contains_key(*id))
            .collect()
    }

    /// 기관 ID의 기관명.
    pub fn institution_name(&self, institution_id: &str) -> Option<String> {
        self.registry
            .get(institution_id)
            .map(|parser| parser.institution_name().to_string())
    }

    /// 한 기관의 환율을 수집합니다.
    ///
    /// 비어 있지 않은 검증 완료 목록 또는 단계별 에러를 반환합니다.
    pub async fn scrape(&self, institution_id: &str) -> ScrapeResult<Vec<ValidatedRate>> {
        let span = tracing::info_span!("scrape", institution = institution_id);

        let result = self.run(institution_id).instrument(span).await;
        if let Err(e) = &result {
            tracing::error!(
                institution = e.institution(),
                stage = %e.stage(),
                error = %e,
                "스크래핑 실패"
            );
        }
        result
    }

    /// 여러 기관을 순서대로 수집합니다. 한 기관의 실패는 다른 기관에 영향을 주지 않습니다.
    pub async fn scrape_many<S: AsRef<str>>(
        &self,
        institution_ids: &[S],
    ) -> Vec<(String, ScrapeResult<Vec<ValidatedRate>>)> {
        let mut results = Vec::with_capacity(institution_ids.len());
        for id in institution_ids {
            let id = id.as_ref();
            results.push((id.to_string(), self.scrape(id).await));
        }
        results
    }

    async fn run(&self, institution_id: &str) -> ScrapeResult<Vec<ValidatedRate>> {
        let parser = self
            .registry
            .get(institution_id)
            .ok_or_else(|| ScrapeError::Unexpected {
                institution: institution_id.to_string(),
                message: "등록된 파서가 없습니다".to_string(),
            })?;
        let institution = parser.institution_name().to_string();

        let source = self
            .sources
            .get(institution_id)
            .ok_or_else(|| ScrapeError::Unexpected {
                institution: institution.clone(),
                message: "소스 설정이 없습니다".to_string(),
            })?;

        // 1. 조회
        let html = self
            .fetcher
            .fetch(source)
            .await
            .and_then(|html| {
                if html.trim().is_empty() {
                    Err(FetchError::EmptyBody {
                        url: source.url.clone(),
                    })
                } else {
                    Ok(html)
                }
            })
            .map_err(|e| ScrapeError::Fetch {
                institution: institution.clone(),
                source: e,
            })?;
        tracing::debug!(bytes = html.len(), "페이지 조회 완료");

        // 2. 파싱 (외부 파서의 panic도 기관명이 붙은 에러로 변환)
        let raw_rates = catch_unwind(AssertUnwindSafe(|| parser.parse(&html)))
            .map_err(|panic| ScrapeError::Unexpected {
                institution: institution.clone(),
                message: panic_message(panic.as_ref()),
            })?
            .map_err(|e| ScrapeError::Parse {
                institution: institution.clone(),
                source: e,
            })?;

        // 등록된 파서가 빈 목록을 돌려주는 경우도 파싱 실패
        if raw_rates.is_empty() {
            return Err(ScrapeError::Parse {
                institution,
                source: ParseError::NoValidRates,
            });
        }

        // 3. 검증 (잘못된 레코드만 제외)
        let total = raw_rates.len();
        let valid: Vec<ValidatedRate> = raw_rates
            .iter()
            .filter_map(|raw| {
                let validated = validator::validate(raw);
                if validated.is_none() {
                    tracing::warn!(record = ?raw, "잘못된 환율 레코드 제외");
                }
                validated
            })
            .collect();

        if valid.is_empty() {
            return Err(ScrapeError::Validation {
                institution,
                rejected: total,
            });
        }

        tracing::info!(
            institution = %institution,
            rates = valid.len(),
            rejected = total - valid.len(),
            "환율 수집 성공"
        );
        Ok(valid)
    }
}

impl std::fmt::Debug for ScrapeOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrapeOrchestrator")
            .field("registry", &self.registry)
            .field("sources", &self.sources.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "파서 내부 오류".to_string())
}
