//! 대만은행 (Bank of Taiwan) 환율 페이지 파서.
//!
//! 페이지 구조:
//! ```html
//! <table class="table ...">
//!   <tbody>
//!     <tr>
//!       <td class="currency">
//!         <div class="visible-phone print_hide">美金 (USD)</div>
//!         <div class="hidden-phone print_show">美金 (USD)</div>
//!       </td>
//!       <td>31.6</td><td>32.27</td><td>31.95</td><td>32.05</td> ...
//!     </tr>
//!   </tbody>
//! </table>
//! ```

use fx_core::{CurrencyName, RawRate, BOT_SOURCE_ID};
use scraper::{ElementRef, Html, Selector};

use super::{
    build_rate, cell_text, collect_rows, parse_selector, RateParser, RowError, RowResult,
    MIN_RATE_CELLS,
};
use crate::error::ParseError;

const ROW_SELECTOR: &str = ".table tbody tr";
const CURRENCY_SELECTOR: &str = ".currency .print_show";

/// 대만은행 파서.
#[derive(Debug, Clone, Default)]
pub struct BotParser;

impl BotParser {
    pub fn new() -> Self {
        Self
    }

    fn extract_row(
        &self,
        row: ElementRef,
        currency_selector: &Selector,
        td_selector: &Selector,
    ) -> RowResult {
        // 통화 셀이 없는 행은 데이터 행이 아님
        let Some(currency_cell) = row.select(currency_selector).next() else {
            return Ok(None);
        };

        let currency = split_designator(&cell_text(&currency_cell))?;

        let cells: Vec<ElementRef> = row.select(td_selector).collect();
        if cells.len() < MIN_RATE_CELLS {
            return Ok(None);
        }

        Ok(Some(build_rate(currency, &cells)))
    }
}

impl RateParser for BotParser {
    fn id(&self) -> &str {
        BOT_SOURCE_ID
    }

    fn institution_name(&self) -> &str {
        "Bank of Taiwan"
    }

    fn parse(&self, html: &str) -> Result<Vec<RawRate>, ParseError> {
        let document = Html::parse_document(html);
        let row_selector = parse_selector(ROW_SELECTOR)?;
        let currency_selector = parse_selector(CURRENCY_SELECTOR)?;
        let td_selector = parse_selector("td")?;

        let rows: Vec<ElementRef> = document.select(&row_selector).collect();
        if rows.is_empty() {
            tracing::error!(institution = self.institution_name(), "환율 테이블을 찾을 수 없음");
            return Err(ParseError::TableNotFound);
        }
        tracing::debug!(
            institution = self.institution_name(),
            rows = rows.len(),
            "환율 테이블 발견"
        );

        collect_rows(self.institution_name(), rows, |row| {
            self.extract_row(row, &currency_selector, &td_selector)
        })
    }
}

/// "美金 (USD)" 형식의 통화 셀을 (USD, 美金)으로 분리합니다.
fn split_designator(text: &str) -> Result<CurrencyName, RowError> {
    let (zh, rest) = text
        .split_once('(')
        .ok_or_else(|| RowError(format!("통화 코드 괄호 없음: {:?}", text)))?;
    let en = rest.split(')').next().unwrap_or_default().trim();
    let zh = zh.trim();

    if zh.is_empty() || en.is_empty() {
        return Err(RowError(format!("통화 셀 형식 오류: {:?}", text)));
    }
    Ok(CurrencyName::new(en, zh))
}
