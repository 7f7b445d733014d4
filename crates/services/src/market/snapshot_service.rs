//! 快照读取与对外序列化
//!
//! 读路径不会触发刷新，也不会向调用方暴露错误

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, error, warn};

use quote_watch_domain::{
    InstrumentClass, PriceBar, QuoteRecord, QuoteWatchError, Snapshot, SnapshotRepository,
    SustainabilityScores,
};
use quote_watch_infrastructure::SnapshotState;

pub struct SnapshotService {
    repository: Arc<dyn SnapshotRepository>,
    state: Arc<SnapshotState>,
}

impl SnapshotService {
    pub fn new(repository: Arc<dyn SnapshotRepository>, state: Arc<SnapshotState>) -> Self {
        Self { repository, state }
    }

    /// 读取最近提交的快照
    ///
    /// 读取或解析失败时回退到内存中的上一份快照（冷启动时为空）
    pub async fn get_snapshot(&self) -> Arc<Snapshot> {
        let loaded = match self.repository.get().await {
            Ok(blob) => Snapshot::from_blob(&blob),
            Err(e) => Err(e),
        };

        match loaded {
            Ok(snapshot) => {
                self.state.replace(snapshot).await;
            }
            Err(QuoteWatchError::SnapshotNotFound) => {
                debug!("{} 中还没有快照，使用内存快照", self.repository.name());
            }
            Err(e) => {
                warn!("读取快照失败，回退到内存快照: {}", e);
            }
        }
        self.state.current().await
    }

    /// 读取并序列化，供 HTTP 接口直接返回
    pub async fn snapshot_json(&self) -> String {
        serialize(self.get_snapshot().await.as_ref())
    }
}

/// 对外的行情字段
#[derive(Debug, Serialize)]
struct QuoteView<'a> {
    short_name: &'a str,
    long_name: &'a str,
    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,
    currency: &'a str,
    history: Vec<BarView>,
    instrument_class: InstrumentClass,
    sustainability: Option<SustainabilityView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct BarView {
    #[serde(with = "rust_decimal::serde::float")]
    open: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    high: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    low: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    close: Decimal,
    volume: u64,
    date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
struct SustainabilityView {
    #[serde(with = "rust_decimal::serde::float_option")]
    total: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    environment: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    social: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    governance: Option<Decimal>,
}

impl From<&PriceBar> for BarView {
    fn from(bar: &PriceBar) -> Self {
        Self {
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            date: bar.date,
        }
    }
}

impl From<&SustainabilityScores> for SustainabilityView {
    fn from(scores: &SustainabilityScores) -> Self {
        Self {
            total: scores.total,
            environment: scores.environment,
            social: scores.social,
            governance: scores.governance,
        }
    }
}

impl<'a> From<&'a QuoteRecord> for QuoteView<'a> {
    fn from(quote: &'a QuoteRecord) -> Self {
        Self {
            short_name: &quote.symbol,
            long_name: &quote.display_name,
            price: quote.current_price,
            currency: &quote.currency,
            history: quote.recent_history.iter().map(BarView::from).collect(),
            instrument_class: quote.instrument_class,
            sustainability: quote.sustainability_scores.as_ref().map(SustainabilityView::from),
        }
    }
}

/// 把快照渲染成 JSON 数组，按代码排序，结果是确定的
pub fn serialize(snapshot: &Snapshot) -> String {
    let views: Vec<QuoteView<'_>> = snapshot.records().map(QuoteView::from).collect();
    serde_json::to_string(&views).unwrap_or_else(|e| {
        error!("快照序列化失败: {}", e);
        "[]".to_string()
    })
}
