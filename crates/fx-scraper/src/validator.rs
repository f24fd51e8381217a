//! 환율 레코드 스키마 검증.
//!
//! 키의 존재만 확인하며 값(호가)이 비어 있는 것은 허용합니다.
//! 네 호가가 모두 비어 있는 레코드도 유효합니다.

use fx_core::{CurrencyName, Quote, RateTable, RawQuote, RawRate, ValidatedRate};

/// 레코드가 스키마를 만족하는지 확인합니다.
///
/// 순서대로 검사하며 처음 실패한 항목에서 중단합니다:
/// 1. `currency`, `rates`, `timestamp` 키
/// 2. `currency.en`, `currency.zh`
/// 3. `rates.cash`, `rates.spot`
/// 4. 각 호가의 `buy`, `sell`
pub fn is_valid(rate: &RawRate) -> bool {
    validate(rate).is_some()
}

/// 레코드를 검증하여 `ValidatedRate`로 변환합니다. 실패 사유는 debug 로그로 남깁니다.
pub fn validate(rate: &RawRate) -> Option<ValidatedRate> {
    match check(rate) {
        Ok(validated) => Some(validated),
        Err(reason) => {
            tracing::debug!(currency = ?rate.currency_code(), reason, "레코드 검증 실패");
            None
        }
    }
}

fn check(rate: &RawRate) -> Result<ValidatedRate, &'static str> {
    let (Some(currency), Some(rates), Some(timestamp)) =
        (&rate.currency, &rate.rates, rate.timestamp)
    else {
        return Err("필수 키 누락 (currency/rates/timestamp)");
    };

    let (Some(en), Some(zh)) = (&currency.en, &currency.zh) else {
        return Err("currency에 en/zh 누락");
    };

    let (Some(cash), Some(spot)) = (rates.cash, rates.spot) else {
        return Err("rates에 cash/spot 누락");
    };

    Ok(ValidatedRate {
        currency: CurrencyName::new(en.clone(), zh.clone()),
        rates: RateTable {
            cash: quote(cash).ok_or("cash에 buy/sell 누락")?,
            spot: quote(spot).ok_or("spot에 buy/sell 누락")?,
        },
        timestamp,
    })
}

fn quote(raw: RawQuote) -> Option<Quote> {
    Some(Quote::new(raw.buy?, raw.sell?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use fx_core::RawRateTable;

    fn full() -> RawRate {
        RawRate::new(
            CurrencyName::new("USD", "美金"),
            Quote::new(Some(31.6), Some(32.27)),
            Quote::new(Some(31.95), Some(32.05)),
            Utc::now(),
        )
    }

    #[test]
    fn test_full_record_is_valid() {
        let raw = full();
        assert!(is_valid(&raw));

        let validated = validate(&raw).unwrap();
        assert_eq!(validated.currency.en, "USD");
        assert_eq!(validated.rates.spot.sell, Some(32.05));
    }

    #[test]
    fn test_missing_top_level_keys() {
        let mut no_currency = full();
        no_currency.currency = None;
        assert!(!is_valid(&no_currency));

        let mut no_rates = full();
        no_rates.rates = None;
        assert!(!is_valid(&no_rates));

        let mut no_timestamp = full();
        no_timestamp.timestamp = None;
        assert!(!is_valid(&no_timestamp));

        assert!(!is_valid(&RawRate::default()));
    }

    #[test]
    fn test_missing_currency_key() {
        let mut raw = full();
        if let Some(currency) = raw.currency.as_mut() {
            currency.zh = None;
        }
        assert!(!is_valid(&raw));
    }

    #[test]
    fn test_missing_spot_table() {
        let mut raw = full();
        raw.rates = Some(RawRateTable {
            cash: Some(Quote::default().into()),
            spot: None,
        });
        assert!(!is_valid(&raw));
    }

    #[test]
    fn test_missing_key_vs_null_value() {
        // 키 없음 -> 무효
        let mut missing = full();
        if let Some(rates) = missing.rates.as_mut() {
            rates.cash = Some(RawQuote {
                buy: Some(Some(31.6)),
                sell: None,
            });
        }
        assert!(!is_valid(&missing));

        // 키는 있고 값이 null -> 유효
        let mut null_value = full();
        if let Some(rates) = null_value.rates.as_mut() {
            rates.cash = Some(RawQuote {
                buy: Some(Some(31.6)),
                sell: Some(None),
            });
        }
        assert!(is_valid(&null_value));
        assert_eq!(validate(&null_value).unwrap().rates.cash.sell, None);
    }

    #[test]
    fn test_all_null_record_is_valid() {
        let raw = RawRate::new(
            CurrencyName::new("ZAR", "南非幣"),
            Quote::default(),
            Quote::default(),
            Utc::now(),
        );
        let validated = validate(&raw).unwrap();
        assert!(validated.is_unquoted());
    }
}
