//! 중국신탁은행 (CTBC Bank) 환율 페이지 파서.
//!
//! 사이트 마크업이 자주 바뀌므로 테이블은 다음 순서로 찾습니다:
//! 1. `table#table_deposit_fxrate_content`
//! 2. `table.table_deposit_fxrate_content`
//! 3. `table.rate-table`
//! 4. 클래스 이름에 "rate"가 포함된 테이블
//!
//! 첫 행은 헤더이며, 통화 셀은 "USD 美金"처럼 공백으로 구분됩니다.

use fx_core::{CurrencyName, RawRate, CTBC_SOURCE_ID};
use scraper::{ElementRef, Html, Selector};

use super::{
    build_rate, cell_text, collect_rows, locate_table, parse_selector, RateParser, RowError,
    RowResult, TableMatcher, MIN_RATE_CELLS,
};
use crate::error::ParseError;

/// CTBC 파서.
#[derive(Debug, Clone)]
pub struct CtbcParser {
    chain: Vec<TableMatcher>,
}

impl Default for CtbcParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CtbcParser {
    /// 기본 탐색 전략으로 생성
    pub fn new() -> Self {
        Self::with_chain(vec![
            TableMatcher::id("table_deposit_fxrate_content"),
            TableMatcher::class("table_deposit_fxrate_content"),
            TableMatcher::class("rate-table"),
            TableMatcher::class_contains("rate"),
        ])
    }

    /// 커스텀 탐색 전략으로 생성
    pub fn with_chain(chain: Vec<TableMatcher>) -> Self {
        Self { chain }
    }

    /// 테이블 탐색 전략 목록.
    pub fn chain(&self) -> &[TableMatcher] {
        &self.chain
    }

    fn extract_row(&self, row: ElementRef, td_selector: &Selector) -> RowResult {
        let cells: Vec<ElementRef> = row.select(td_selector).collect();
        if cells.len() < MIN_RATE_CELLS {
            return Ok(None);
        }

        let currency = split_tokens(&cell_text(&cells[0]))?;
        Ok(Some(build_rate(currency, &cells)))
    }
}

impl RateParser for CtbcParser {
    fn id(&self) -> &str {
        CTBC_SOURCE_ID
    }

    fn institution_name(&self) -> &str {
        "CTBC Bank"
    }

    fn parse(&self, html: &str) -> Result<Vec<RawRate>, ParseError> {
        let document = Html::parse_document(html);
        let table_count = document.select(&parse_selector("table")?).count();
        tracing::debug!(institution = self.institution_name(), tables = table_count, "테이블 검색");

        let Some((_, table)) = locate_table(&document, &self.chain)? else {
            tracing::error!(institution = self.institution_name(), "환율 테이블을 찾을 수 없음");
            return Err(ParseError::TableNotFound);
        };

        let tr_selector = parse_selector("tr")?;
        let td_selector = parse_selector("td")?;

        // 첫 행은 헤더
        let rows = table.select(&tr_selector).skip(1);
        collect_rows(self.institution_name(), rows, |row| {
            self.extract_row(row, &td_selector)
        })
    }
}

/// "USD 美金" 형식의 통화 셀을 분리합니다.
fn split_tokens(text: &str) -> Result<CurrencyName, RowError> {
    let mut parts = text.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(en), Some(zh)) => Ok(CurrencyName::new(en, zh)),
        _ => Err(RowError(format!("예상치 못한 통화 형식: {:?}", text))),
    }
}
