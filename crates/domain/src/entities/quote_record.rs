//! 行情记录实体

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::enums::InstrumentClass;

/// 单根日线
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(with = "rust_decimal::serde::float")]
    pub open: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub high: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub low: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub close: Decimal,
    #[serde(default)]
    pub volume: u64,
}

impl PriceBar {
    /// 只关心开盘价的场景（测试、简化数据源）
    pub fn from_open(open: Decimal) -> Self {
        Self {
            date: None,
            open,
            high: open,
            low: open,
            close: open,
            volume: 0,
        }
    }
}

/// ESG 评分，仅股票有
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SustainabilityScores {
    #[serde(with = "rust_decimal::serde::float_option", default)]
    pub total: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option", default)]
    pub environment: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option", default)]
    pub social: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option", default)]
    pub governance: Option<Decimal>,
}

/// 一个标的的最新行情
///
/// 每次刷新整体覆盖，不做字段级合并
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub instrument_class: InstrumentClass,
    pub symbol: String,
    pub display_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub current_price: Decimal,
    pub currency: String,
    /// 最近的日线，最新的在前
    pub recent_history: Vec<PriceBar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sustainability_scores: Option<SustainabilityScores>,
}

impl QuoteRecord {
    /// 最近两根K线的开盘价 `(new_open, old_open)`，不足两根时返回 None
    pub fn latest_opens(&self) -> Option<(Decimal, Decimal)> {
        match self.recent_history.as_slice() {
            [newest, previous, ..] => Some((newest.open, previous.open)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(opens: &[&str]) -> QuoteRecord {
        QuoteRecord {
            instrument_class: InstrumentClass::Equity,
            symbol: "AAPL".to_string(),
            display_name: "Apple Inc.".to_string(),
            current_price: dec!(150),
            currency: "USD".to_string(),
            recent_history: opens
                .iter()
                .map(|o| PriceBar::from_open(o.parse().unwrap()))
                .collect(),
            sustainability_scores: None,
        }
    }

    #[test]
    fn test_latest_opens_takes_first_two_bars() {
        let quote = record(&["152", "148", "140"]);
        assert_eq!(quote.latest_opens(), Some((dec!(152), dec!(148))));
    }

    #[test]
    fn test_latest_opens_needs_two_bars() {
        assert_eq!(record(&["152"]).latest_opens(), None);
        assert_eq!(record(&[]).latest_opens(), None);
    }

    #[test]
    fn test_persisted_layout_round_trips() {
        let mut quote = record(&["152.5", "148"]);
        quote.sustainability_scores = Some(SustainabilityScores {
            total: Some(dec!(17.25)),
            environment: Some(dec!(0.5)),
            social: None,
            governance: Some(dec!(9.125)),
        });
        let json = serde_json::to_value(&quote).unwrap();
        assert_eq!(json["instrument_class"], "EQUITY");
        assert_eq!(json["current_price"], 150.0);
        assert_eq!(json["recent_history"][0]["open"], 152.5);

        let back: QuoteRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, quote);
    }
}
