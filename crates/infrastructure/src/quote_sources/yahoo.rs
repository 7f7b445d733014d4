//! Yahoo Finance 行情适配器
//!
//! 实现 domain 层的 [`QuoteSource`]，把 chart 接口的响应整理成 [`QuoteRecord`]

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use quote_watch_core::{AppError, AppResult};
use quote_watch_domain::{
    InstrumentClass, PriceBar, QuoteRecord, QuoteSource, QuoteWatchError, SustainabilityScores,
};

const USER_AGENT: &str = "Mozilla/5.0 (compatible; quote-watch/0.1)";

/// Yahoo 适配器配置
#[derive(Debug, Clone)]
pub struct YahooConfig {
    pub base_url: String,
    pub timeout: Duration,
}

pub struct YahooQuoteSource {
    client: Client,
    base_url: String,
}

impl YahooQuoteSource {
    pub fn new(config: YahooConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::Config(format!("构建 HTTP 客户端失败: {}", e)))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_chart(&self, symbol: &str) -> Result<ChartResponse, QuoteWatchError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        debug!("Yahoo: 获取日线 - {}", symbol);

        let response = self
            .client
            .get(&url)
            .query(&[("range", "1mo"), ("interval", "1d")])
            .send()
            .await
            .map_err(|e| provider_error(symbol, e))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(QuoteWatchError::missing(symbol, "chart"));
        }
        if !status.is_success() {
            return Err(QuoteWatchError::Provider {
                symbol: symbol.to_string(),
                message: format!("HTTP {}", status),
            });
        }

        response
            .json::<ChartResponse>()
            .await
            .map_err(|e| provider_error(symbol, e))
    }

    /// ESG 评分只是附加信息，任何失败都只记一条警告
    async fn fetch_sustainability(&self, symbol: &str) -> Option<SustainabilityScores> {
        let url = format!("{}/v10/finance/quoteSummary/{}", self.base_url, symbol);
        let result = async {
            let response = self
                .client
                .get(&url)
                .query(&[("modules", "esgScores")])
                .send()
                .await?
                .error_for_status()?;
            response.json::<QuoteSummaryResponse>().await
        }
        .await;

        match result {
            Ok(summary) => parse_sustainability(summary),
            Err(e) => {
                warn!("Yahoo: 获取 ESG 评分失败 {}: {}", symbol, e);
                None
            }
        }
    }
}

#[async_trait]
impl QuoteSource for YahooQuoteSource {
    fn name(&self) -> &str {
        "yahoo"
    }

    async fn fetch(
        &self,
        symbol: &str,
        class: InstrumentClass,
    ) -> Result<QuoteRecord, QuoteWatchError> {
        let chart = self.fetch_chart(symbol).await?;
        let mut record = parse_chart(symbol, class, chart)?;
        if class.has_sustainability() {
            record.sustainability_scores = self.fetch_sustainability(symbol).await;
        }
        Ok(record)
    }
}

fn provider_error(symbol: &str, e: reqwest::Error) -> QuoteWatchError {
    QuoteWatchError::Provider {
        symbol: symbol.to_string(),
        message: e.to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    currency: Option<String>,
    long_name: Option<String>,
    regular_market_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteSeries>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteSeries {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

fn to_decimal(value: f64) -> Option<Decimal> {
    Decimal::try_from(value).ok().map(|d| d.normalize())
}

/// 把 chart 响应整理成行情记录，日线按最新在前排列
fn parse_chart(
    symbol: &str,
    class: InstrumentClass,
    response: ChartResponse,
) -> Result<QuoteRecord, QuoteWatchError> {
    let result = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| QuoteWatchError::missing(symbol, "chart.result"))?;

    let display_name = result
        .meta
        .long_name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| QuoteWatchError::missing(symbol, "longName"))?;
    let currency = result
        .meta
        .currency
        .ok_or_else(|| QuoteWatchError::missing(symbol, "currency"))?;

    let series = result.indicators.quote.into_iter().next().unwrap_or_default();
    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, ts) in result.timestamp.iter().enumerate() {
        let cell = |column: &Vec<Option<f64>>| column.get(i).copied().flatten().and_then(to_decimal);
        // 非交易时段 Yahoo 会给出空值，整行丢弃
        let (Some(open), Some(high), Some(low), Some(close)) = (
            cell(&series.open),
            cell(&series.high),
            cell(&series.low),
            cell(&series.close),
        ) else {
            continue;
        };
        bars.push(PriceBar {
            date: DateTime::<Utc>::from_timestamp(*ts, 0),
            open,
            high,
            low,
            close,
            volume: series.volume.get(i).copied().flatten().unwrap_or(0),
        });
    }
    if bars.is_empty() {
        return Err(QuoteWatchError::missing(symbol, "history"));
    }
    bars.reverse();

    let current_price = result
        .meta
        .regular_market_price
        .and_then(to_decimal)
        .or_else(|| bars.first().map(|bar| bar.open))
        .ok_or_else(|| QuoteWatchError::missing(symbol, "currentPrice"))?;

    Ok(QuoteRecord {
        instrument_class: class,
        symbol: symbol.to_string(),
        display_name,
        current_price,
        currency,
        recent_history: bars,
        sustainability_scores: None,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResponse {
    quote_summary: QuoteSummaryBody,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryBody {
    result: Option<Vec<QuoteSummaryResult>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResult {
    esg_scores: Option<EsgScores>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EsgScores {
    total_esg: Option<RawValue>,
    environment_score: Option<RawValue>,
    social_score: Option<RawValue>,
    governance_score: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct RawValue {
    raw: Option<f64>,
}

fn parse_sustainability(response: QuoteSummaryResponse) -> Option<SustainabilityScores> {
    let esg = response
        .quote_summary
        .result?
        .into_iter()
        .next()?
        .esg_scores?;
    let value = |v: Option<RawValue>| v.and_then(|v| v.raw).and_then(to_decimal);
    let scores = SustainabilityScores {
        total: value(esg.total_esg),
        environment: value(esg.environment_score),
        social: value(esg.social_score),
        governance: value(esg.governance_score),
    };
    let any = scores.total.is_some()
        || scores.environment.is_some()
        || scores.social.is_some()
        || scores.governance.is_some();
    any.then_some(scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const CHART: &str = r#"{
        "chart": {
            "result": [{
                "meta": {
                    "currency": "USD",
                    "symbol": "AAPL",
                    "longName": "Apple Inc.",
                    "regularMarketPrice": 150.0
                },
                "timestamp": [1700000000, 1700086400, 1700172800],
                "indicators": { "quote": [{
                    "open":   [148.0, null, 152.0],
                    "high":   [149.5, null, 153.0],
                    "low":    [147.0, null, 151.0],
                    "close":  [149.0, null, 152.5],
                    "volume": [1000, null, 2000]
                }]}
            }],
            "error": null
        }
    }"#;

    fn chart(raw: &str) -> ChartResponse {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn test_parse_chart_orders_newest_first() {
        let record = parse_chart("AAPL", InstrumentClass::Equity, chart(CHART)).unwrap();

        assert_eq!(record.display_name, "Apple Inc.");
        assert_eq!(record.currency, "USD");
        assert_eq!(record.current_price, dec!(150));
        assert_eq!(record.recent_history.len(), 2);
        assert_eq!(record.latest_opens(), Some((dec!(152), dec!(148))));
        assert_eq!(record.recent_history[0].volume, 2000);
        assert_eq!(
            record.recent_history[0].date.map(|d| d.timestamp()),
            Some(1700172800)
        );
    }

    #[test]
    fn test_price_falls_back_to_latest_open() {
        let raw = CHART.replace(r#""regularMarketPrice": 150.0"#, r#""regularMarketPrice": null"#);
        let record = parse_chart("AAPL", InstrumentClass::Equity, chart(&raw)).unwrap();
        assert_eq!(record.current_price, dec!(152));
    }

    #[test]
    fn test_missing_long_name_is_provider_data_missing() {
        let raw = CHART.replace(r#""longName": "Apple Inc.","#, "");
        let err = parse_chart("AAPL", InstrumentClass::Equity, chart(&raw)).unwrap_err();
        assert_eq!(err, QuoteWatchError::missing("AAPL", "longName"));
    }

    #[test]
    fn test_empty_result_is_provider_data_missing() {
        let err = parse_chart(
            "BTC-USD",
            InstrumentClass::Crypto,
            chart(r#"{"chart": {"result": null, "error": {"code": "Not Found"}}}"#),
        )
        .unwrap_err();
        assert!(matches!(err, QuoteWatchError::ProviderDataMissing { .. }));
    }

    #[test]
    fn test_all_null_rows_is_provider_data_missing() {
        let raw = r#"{"chart": {"result": [{
            "meta": {"currency": "USD", "longName": "Bitcoin USD", "regularMarketPrice": 1.0},
            "timestamp": [1700000000],
            "indicators": {"quote": [{"open": [null], "high": [null], "low": [null], "close": [null], "volume": [null]}]}
        }]}}"#;
        let err = parse_chart("BTC-USD", InstrumentClass::Crypto, chart(raw)).unwrap_err();
        assert_eq!(err, QuoteWatchError::missing("BTC-USD", "history"));
    }

    #[test]
    fn test_parse_sustainability() {
        let raw = r#"{"quoteSummary": {"result": [{"esgScores": {
            "totalEsg": {"raw": 17.25, "fmt": "17.25"},
            "environmentScore": {"raw": 0.5},
            "socialScore": {},
            "governanceScore": {"raw": 9.125}
        }}], "error": null}}"#;
        let scores = parse_sustainability(serde_json::from_str(raw).unwrap()).unwrap();
        assert_eq!(scores.total, Some(dec!(17.25)));
        assert_eq!(scores.social, None);

        let empty = r#"{"quoteSummary": {"result": [{}]}}"#;
        assert!(parse_sustainability(serde_json::from_str(empty).unwrap()).is_none());
    }
}
