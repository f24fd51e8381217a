//! 환율 테이블 탐색 전략.
//!
//! 은행 사이트는 예고 없이 마크업을 바꾸므로 테이블을 하나의 고정 셀렉터 대신
//! 구체성이 낮아지는 순서의 전략 목록으로 찾습니다.

use scraper::{ElementRef, Html, Selector};

use crate::error::ParseError;

/// `<table>` 요소 하나를 찾는 전략.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableMatcher {
    /// 임의의 CSS 셀렉터에 처음 일치하는 요소
    Css(String),
    /// `id`가 정확히 일치하는 테이블
    Id(String),
    /// 클래스 목록에 해당 클래스를 가진 테이블
    Class(String),
    /// 클래스 이름 중 하나가 부분 문자열을 포함하는 테이블 (대소문자 무시)
    ClassContains(String),
}

impl TableMatcher {
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    pub fn class(class: impl Into<String>) -> Self {
        Self::Class(class.into())
    }

    pub fn class_contains(fragment: impl Into<String>) -> Self {
        Self::ClassContains(fragment.into().to_lowercase())
    }

    /// 문서에서 이 전략에 맞는 첫 요소를 찾습니다.
    pub fn find<'a>(&self, document: &'a Html) -> Result<Option<ElementRef<'a>>, ParseError> {
        if let Self::Css(css) = self {
            let selector = parse_selector(css)?;
            return Ok(document.select(&selector).next());
        }

        let tables = parse_selector("table")?;
        let found = document.select(&tables).find(|table| {
            let element = table.value();
            match self {
                Self::Id(id) => element.id() == Some(id.as_str()),
                Self::Class(class) => element.classes().any(|c| c == class),
                Self::ClassContains(fragment) => element
                    .classes()
                    .any(|c| c.to_lowercase().contains(fragment.as_str())),
                Self::Css(_) => false,
            }
        });
        Ok(found)
    }
}

impl std::fmt::Display for TableMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Css(css) => write!(f, "css({})", css),
            Self::Id(id) => write!(f, "table#{}", id),
            Self::Class(class) => write!(f, "table.{}", class),
            Self::ClassContains(fragment) => write!(f, "table[class*={}]", fragment),
        }
    }
}

/// 전략 목록을 순서대로 시도하여 처음 찾은 테이블과 전략 인덱스를 반환합니다.
pub fn locate_table<'a>(
    document: &'a Html,
    chain: &[TableMatcher],
) -> Result<Option<(usize, ElementRef<'a>)>, ParseError> {
    for (idx, matcher) in chain.iter().enumerate() {
        if let Some(table) = matcher.find(document)? {
            tracing::debug!(matcher = %matcher, attempt = idx + 1, "환율 테이블 발견");
            return Ok(Some((idx, table)));
        }
        tracing::debug!(matcher = %matcher, "일치하는 테이블 없음, 다음 전략 시도");
    }
    Ok(None)
}

/// CSS 셀렉터 파싱.
pub fn parse_selector(css: &str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|_| ParseError::Selector(css.to_string()))
}
