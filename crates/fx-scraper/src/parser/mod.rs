//! 기관별 환율 페이지 파서.
//!
//! 각 기관은 `RateParser`를 구현합니다. 테이블 탐색과 통화 셀 해석은 기관마다 다르고,
//! 행 단위 처리 규칙(건너뛰기, 최소 셀 수, 숫자 파싱, 타임스탬프)은 공통입니다.
//!
//! ## 지원 기관
//! - `BotParser`: 대만은행 (Bank of Taiwan)
//! - `CtbcParser`: 중국신탁은행 (CTBC Bank)

pub mod bot;
pub mod ctbc;
pub mod selector;

pub use bot::BotParser;
pub use ctbc::CtbcParser;
pub use selector::{locate_table, parse_selector, TableMatcher};

use chrono::Utc;
use fx_core::{CurrencyName, Quote, RawRate};
use scraper::ElementRef;
use thiserror::Error;

use crate::error::ParseError;
use crate::numeric::parse_rate;

/// 통화 셀 + 현찰 매입/매도 + 현물 매입/매도.
pub const MIN_RATE_CELLS: usize = 5;

/// 기관별 HTML 파서.
pub trait RateParser: Send + Sync {
    /// 레지스트리 키 (예: "bot").
    fn id(&self) -> &str;

    /// 기관명 (예: "Bank of Taiwan").
    fn institution_name(&self) -> &str;

    /// 문서에서 환율 레코드를 추출합니다.
    ///
    /// 테이블을 찾지 못하면 `ParseError::TableNotFound`,
    /// 레코드가 하나도 없으면 `ParseError::NoValidRates`를 반환합니다.
    fn parse(&self, html: &str) -> Result<Vec<RawRate>, ParseError>;
}

/// 한 행을 처리하다 발생한 문제. 로그만 남기고 해당 행은 건너뜁니다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct RowError(pub String);

/// 행 추출 결과. `Ok(None)`은 데이터 행이 아니어서 건너뛴 경우입니다.
pub type RowResult = Result<Option<RawRate>, RowError>;

/// 행 목록을 순회하며 레코드를 모읍니다.
///
/// 행 단위 실패는 경고 로그 후 무시하고, 결과가 비면 `NoValidRates`를 반환합니다.
pub(crate) fn collect_rows<'a, I, F>(
    institution: &str,
    rows: I,
    mut extract: F,
) -> Result<Vec<RawRate>, ParseError>
where
    I: IntoIterator<Item = ElementRef<'a>>,
    F: FnMut(ElementRef<'a>) -> RowResult,
{
    let mut rates = Vec::new();
    let mut skipped = 0usize;

    for (idx, row) in rows.into_iter().enumerate() {
        match extract(row) {
            Ok(Some(rate)) => rates.push(rate),
            Ok(None) => skipped += 1,
            Err(e) => {
                skipped += 1;
                tracing::warn!(institution, row = idx, error = %e, "행 파싱 실패, 건너뜀");
            }
        }
    }

    tracing::debug!(institution, parsed = rates.len(), skipped, "행 파싱 완료");

    if rates.is_empty() {
        return Err(ParseError::NoValidRates);
    }
    Ok(rates)
}

/// 셀의 텍스트를 공백 정리 후 반환합니다.
pub(crate) fn cell_text(cell: &ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// 통화 식별자와 셀 목록으로 레코드를 만듭니다.
///
/// `cells[0]`은 통화 셀, `cells[1..5]`는 현찰 매입/매도, 현물 매입/매도입니다.
/// 호출 전에 셀 수가 `MIN_RATE_CELLS` 이상인지 확인해야 합니다.
pub(crate) fn build_rate(currency: CurrencyName, cells: &[ElementRef]) -> RawRate {
    let value = |idx: usize| parse_rate(&cell_text(&cells[idx]));

    RawRate::new(
        currency,
        Quote::new(value(1), value(2)),
        Quote::new(value(3), value(4)),
        Utc::now(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    #[test]
    fn test_row_error_is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(RowError("통화 셀 형식 오류".to_string()));
        assert_eq!(err.to_string(), "통화 셀 형식 오류");
    }

    #[test]
    fn test_collect_rows_skips_failed_rows() {
        let html = Html::parse_fragment("<table><tr><td>a</td></tr><tr><td>b</td></tr></table>");
        let selector = Selector::parse("tr").unwrap();

        let err = collect_rows("Test Bank", html.select(&selector), |row| {
            Err(RowError(cell_text(&row)))
        })
        .unwrap_err();

        assert_eq!(err, ParseError::NoValidRates);
    }
}
