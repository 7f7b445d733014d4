//! 账户簿来源接口

use async_trait::async_trait;

use crate::entities::AccountBook;
use crate::errors::QuoteWatchError;

/// 每轮评估前加载一次最新的持仓与目录
#[async_trait]
pub trait AccountBookSource: Send + Sync {
    async fn load(&self) -> Result<AccountBook, QuoteWatchError>;
}
