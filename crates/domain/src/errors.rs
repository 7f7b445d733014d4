//! 行情与提醒相关的错误分类

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuoteWatchError {
    /// 行情源缺少必要字段，多半是被限流
    #[error("行情数据缺少字段 {field} ({symbol})，可能已被限流")]
    ProviderDataMissing { symbol: String, field: String },

    #[error("行情请求失败 ({symbol}): {message}")]
    Provider { symbol: String, message: String },

    #[error("快照存储不可用: {0}")]
    StoreUnavailable(String),

    #[error("快照不存在")]
    SnapshotNotFound,

    #[error("快照数据损坏: {0}")]
    Corrupt(String),

    #[error("账户不存在: {0}")]
    AccountNotFound(String),

    #[error("提醒价格无法解析: {0:?}")]
    MalformedAlertValue(String),

    #[error("通知发送失败 ({to}): {message}")]
    DispatchFailure { to: String, message: String },

    #[error("标的配置无效: {0}")]
    InvalidTickerSpec(String),
}

impl QuoteWatchError {
    pub fn missing(symbol: &str, field: &str) -> Self {
        QuoteWatchError::ProviderDataMissing {
            symbol: symbol.to_string(),
            field: field.to_string(),
        }
    }
}
