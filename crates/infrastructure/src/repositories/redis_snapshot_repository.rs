//! 基于 Redis 单个字符串 key 的快照仓储

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::{debug, error};

use quote_watch_core::cache::get_redis_connection;
use quote_watch_domain::{QuoteWatchError, SnapshotRepository};

/// `SET` 本身是原子的，读者不会看到半截快照
pub struct RedisSnapshotRepository {
    key: String,
}

impl RedisSnapshotRepository {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

fn unavailable(e: impl std::fmt::Display) -> QuoteWatchError {
    QuoteWatchError::StoreUnavailable(e.to_string())
}

#[async_trait]
impl SnapshotRepository for RedisSnapshotRepository {
    fn name(&self) -> &str {
        "redis"
    }

    async fn put(&self, blob: &str) -> Result<(), QuoteWatchError> {
        let mut conn = get_redis_connection().await.map_err(unavailable)?;
        let _: () = conn.set(&self.key, blob).await.map_err(|e| {
            error!("Redis set error: {:?}", e);
            unavailable(e)
        })?;
        debug!("快照已写入 Redis key={} ({} bytes)", self.key, blob.len());
        Ok(())
    }

    async fn get(&self) -> Result<String, QuoteWatchError> {
        let mut conn = get_redis_connection().await.map_err(unavailable)?;
        let blob: Option<String> = conn.get(&self.key).await.map_err(|e| {
            error!("Redis get error: {:?}", e);
            unavailable(e)
        })?;
        blob.filter(|b| !b.trim().is_empty())
            .ok_or(QuoteWatchError::SnapshotNotFound)
    }
}
