//! 기관 ID별 파서 레지스트리.
//!
//! 새 기관은 `RateParser`를 구현하고 `register`로 추가하면 되며
//! 오케스트레이터는 수정할 필요가 없습니다.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::parser::{BotParser, CtbcParser, RateParser};

/// 기관 ID → 파서 매핑.
#[derive(Clone, Default)]
pub struct ParserRegistry {
    parsers: BTreeMap<String, Arc<dyn RateParser>>,
}

impl ParserRegistry {
    /// 빈 레지스트리.
    pub fn new() -> Self {
        Self::default()
    }

    /// 대만은행, CTBC 파서가 등록된 레지스트리.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(BotParser::new());
        registry.register(CtbcParser::new());
        registry
    }

    /// 파서를 `id()`로 등록합니다. 같은 ID가 있으면 교체하고 이전 파서를 반환합니다.
    pub fn register<P: RateParser + 'static>(&mut self, parser: P) -> Option<Arc<dyn RateParser>> {
        let id = parser.id().to_string();
        tracing::debug!(id = %id, institution = parser.institution_name(), "파서 등록");
        self.parsers.insert(id, Arc::new(parser))
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn RateParser>> {
        self.parsers.get(id).cloned()
    }

    /// 등록된 기관 ID 목록 (정렬됨).
    pub fn ids(&self) -> Vec<&str> {
        self.parsers.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}

impl std::fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("ids", &self.ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;
    use fx_core::RawRate;

    struct EmptyParser;

    impl RateParser for EmptyParser {
        fn id(&self) -> &str {
            "ctbc"
        }

        fn institution_name(&self) -> &str {
            "Replacement"
        }

        fn parse(&self, _html: &str) -> Result<Vec<RawRate>, ParseError> {
            Err(ParseError::NoValidRates)
        }
    }

    #[test]
    fn test_defaults() {
        let registry = ParserRegistry::with_defaults();
        assert_eq!(registry.ids(), vec!["bot", "ctbc"]);
        assert_eq!(
            registry.get("bot").unwrap().institution_name(),
            "Bank of Taiwan"
        );
        assert!(registry.get("hsbc").is_none());
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = ParserRegistry::with_defaults();
        let previous = registry.register(EmptyParser).unwrap();

        assert_eq!(previous.institution_name(), "CTBC Bank");
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("ctbc").unwrap().institution_name(), "Replacement");
    }
}
