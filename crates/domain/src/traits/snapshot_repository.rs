//! 快照仓储接口 - 整块 blob 读写，后写覆盖

use async_trait::async_trait;

use crate::errors::QuoteWatchError;

#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    fn name(&self) -> &str;

    /// 整体覆盖上一份快照
    async fn put(&self, blob: &str) -> Result<(), QuoteWatchError>;

    /// 没有快照时返回 [`QuoteWatchError::SnapshotNotFound`]
    async fn get(&self) -> Result<String, QuoteWatchError>;
}
