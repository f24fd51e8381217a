//! 환율 레코드 타입.
//!
//! 스크래핑 파이프라인의 단계별 레코드를 정의합니다:
//! - `RawRate` - 파서가 생성한 검증 전 레코드
//! - `ValidatedRate` - 스키마 검증을 통과한 레코드
//! - `NormalizedRate` - 기관명이 붙은 저장용 평탄화 레코드

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 통화 식별자 (영문 코드 + 중문 명칭).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyName {
    /// 영문 통화 코드 (예: USD)
    pub en: String,
    /// 중문 통화 명칭 (예: 美金)
    pub zh: String,
}

impl CurrencyName {
    /// 새 통화 식별자를 생성합니다.
    pub fn new(en: impl Into<String>, zh: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            zh: zh.into(),
        }
    }
}

/// 매입/매도 호가. `None`은 "호가 없음"을 의미합니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// 은행 매입가
    pub buy: Option<f64>,
    /// 은행 매도가
    pub sell: Option<f64>,
}

impl Quote {
    pub fn new(buy: Option<f64>, sell: Option<f64>) -> Self {
        Self { buy, sell }
    }
}

/// 현찰/현물 환율 묶음.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    /// 현찰 환율
    pub cash: Quote,
    /// 현물(전신환) 환율
    pub spot: Quote,
}

/// 검증 전 통화 키.
///
/// 각 필드의 `None`은 키 자체가 없음을 뜻합니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCurrency {
    pub en: Option<String>,
    pub zh: Option<String>,
}

/// 검증 전 호가 키.
///
/// 바깥 `Option`은 키 존재 여부, 안쪽 `Option`은 값(호가) 존재 여부입니다.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawQuote {
    pub buy: Option<Option<f64>>,
    pub sell: Option<Option<f64>>,
}

impl From<Quote> for RawQuote {
    fn from(quote: Quote) -> Self {
        Self {
            buy: Some(quote.buy),
            sell: Some(quote.sell),
        }
    }
}

/// 검증 전 환율 묶음 키.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawRateTable {
    pub cash: Option<RawQuote>,
    pub spot: Option<RawQuote>,
}

/// 파서가 생성한 검증 전 환율 레코드.
///
/// 생성 후 변경되지 않으며, 검증을 거쳐 `ValidatedRate`가 되거나 폐기됩니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRate {
    pub currency: Option<RawCurrency>,
    pub rates: Option<RawRateTable>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl RawRate {
    /// 모든 키가 채워진 레코드를 생성합니다.
    pub fn new(currency: CurrencyName, cash: Quote, spot: Quote, timestamp: DateTime<Utc>) -> Self {
        Self {
            currency: Some(RawCurrency {
                en: Some(currency.en),
                zh: Some(currency.zh),
            }),
            rates: Some(RawRateTable {
                cash: Some(cash.into()),
                spot: Some(spot.into()),
            }),
            timestamp: Some(timestamp),
        }
    }

    /// 통화 코드 (로그용).
    pub fn currency_code(&self) -> Option<&str> {
        self.currency.as_ref().and_then(|c| c.en.as_deref())
    }
}

/// 스키마 검증을 통과한 환율 레코드.
///
/// JSON 표현은 `currency.en/zh`, `rates.cash.buy/sell`, `rates.spot.buy/sell`,
/// `timestamp` 형태입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedRate {
    pub currency: CurrencyName,
    pub rates: RateTable,
    pub timestamp: DateTime<Utc>,
}

impl ValidatedRate {
    /// 네 개의 호가가 모두 비어 있는지 확인합니다.
    pub fn is_unquoted(&self) -> bool {
        let RateTable { cash, spot } = self.rates;
        [cash.buy, cash.sell, spot.buy, spot.sell]
            .iter()
            .all(Option::is_none)
    }
}

/// 기관명이 붙은 저장용 환율 레코드.
///
/// 네 개의 호가를 최상위로 올리되 원본 `rates` 구조도 함께 보존합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRate {
    /// 기관명 (예: "Bank of Taiwan")
    pub institution: String,
    pub currency_en: String,
    pub currency_zh: String,
    pub cash_buy: Option<f64>,
    pub cash_sell: Option<f64>,
    pub spot_buy: Option<f64>,
    pub spot_sell: Option<f64>,
    pub rates: RateTable,
    pub timestamp: DateTime<Utc>,
}

impl NormalizedRate {
    /// 검증된 레코드를 기관명과 함께 평탄화합니다.
    pub fn from_validated(institution: impl Into<String>, rate: &ValidatedRate) -> Self {
        Self {
            institution: institution.into(),
            currency_en: rate.currency.en.clone(),
            currency_zh: rate.currency.zh.clone(),
            cash_buy: rate.rates.cash.buy,
            cash_sell: rate.rates.cash.sell,
            spot_buy: rate.rates.spot.buy,
            spot_sell: rate.rates.spot.sell,
            rates: rate.rates,
            timestamp: rate.timestamp,
        }
    }
}
