//! 行情源接口

use async_trait::async_trait;

use crate::entities::QuoteRecord;
use crate::enums::InstrumentClass;
use crate::errors::QuoteWatchError;

/// 按代码拉取一个标的的最新行情
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// 数据源名称，用于日志
    fn name(&self) -> &str;

    /// 缺字段时返回 [`QuoteWatchError::ProviderDataMissing`]
    async fn fetch(&self, symbol: &str, class: InstrumentClass)
        -> Result<QuoteRecord, QuoteWatchError>;
}
