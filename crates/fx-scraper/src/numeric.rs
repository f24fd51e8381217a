//! 환율 셀 문자열 파싱.

/// "호가 없음"을 뜻하는 셀 값.
pub const NO_QUOTE_TOKENS: [&str; 5] = ["-", "N/A", "", "----", "---"];

/// 환율 셀 텍스트를 숫자로 변환합니다.
///
/// - 앞뒤 공백 제거
/// - `NO_QUOTE_TOKENS`는 `None`
/// - 천 단위 쉼표 제거 후 변환
/// - 그 밖의 숫자가 아닌 값은 로그를 남기고 `None` (행/배치를 실패시키지 않음)
///
/// ```
/// use fx_scraper::numeric::parse_rate;
///
/// assert_eq!(parse_rate(" 1,234.56 "), Some(1234.56));
/// assert_eq!(parse_rate("----"), None);
/// ```
pub fn parse_rate(cell: &str) -> Option<f64> {
    let cleaned = cell.trim();
    if NO_QUOTE_TOKENS.contains(&cleaned) {
        return None;
    }

    let digits = cleaned.replace(',', "");
    match digits.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        Ok(_) | Err(_) => {
            tracing::warn!(cell = cleaned, "환율 셀 파싱 실패, 호가 없음으로 처리");
            None
        }
    }
}
