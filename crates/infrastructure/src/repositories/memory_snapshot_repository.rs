//! 进程内快照仓储，用于测试和本地运行

use async_trait::async_trait;
use tokio::sync::RwLock;

use quote_watch_domain::{QuoteWatchError, SnapshotRepository};

#[derive(Default)]
pub struct InMemorySnapshotRepository {
    blob: RwLock<Option<String>>,
}

impl InMemorySnapshotRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotRepository for InMemorySnapshotRepository {
    fn name(&self) -> &str {
        "memory"
    }

    async fn put(&self, blob: &str) -> Result<(), QuoteWatchError> {
        *self.blob.write().await = Some(blob.to_string());
        Ok(())
    }

    async fn get(&self) -> Result<String, QuoteWatchError> {
        self.blob
            .read()
            .await
            .clone()
            .ok_or(QuoteWatchError::SnapshotNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_last_writer_wins() {
        let repo = InMemorySnapshotRepository::new();
        assert_eq!(repo.get().await, Err(QuoteWatchError::SnapshotNotFound));

        repo.put("{}").await.unwrap();
        repo.put(r#"{"AAPL":{}}"#).await.unwrap();
        assert_eq!(repo.get().await.unwrap(), r#"{"AAPL":{}}"#);
    }
}
