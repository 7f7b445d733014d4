//! 基于 JSON 文件的账户簿（持仓 + 目录）

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, warn};

use quote_watch_domain::{AccountBook, AccountBookSource, QuoteWatchError};

/// 每次 `load` 都重新读取文件，外部对账户数据的修改下一轮即生效
pub struct JsonAccountBookRepository {
    path: PathBuf,
}

impl JsonAccountBookRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl AccountBookSource for JsonAccountBookRepository {
    async fn load(&self) -> Result<AccountBook, QuoteWatchError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("账户文件 {} 不存在，本轮没有需要评估的持仓", self.path.display());
                return Ok(AccountBook::default());
            }
            Err(e) => {
                return Err(QuoteWatchError::StoreUnavailable(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let book: AccountBook = serde_json::from_str(&raw)
            .map_err(|e| QuoteWatchError::Corrupt(format!("{}: {}", self.path.display(), e)))?;
        debug!(
            "账户簿加载完成: advisors={}, managers={}, holdings={}",
            book.advisors.len(),
            book.managers.len(),
            book.holding_count()
        );
        Ok(book)
    }
}
