use once_cell::sync::OnceCell;
use redis::aio::MultiplexedConnection;
use redis::Client;
use tracing::{debug, error, info};

use crate::error::{AppError, AppResult};

/// Redis连接池管理器
///
/// redis 的多路复用连接本身可以并发使用，这里只缓存 Client 并按需建立连接
pub struct RedisConnectionPool {
    client: Client,
}

impl RedisConnectionPool {
    /// 创建连接池并做一次连通性测试
    pub async fn new(redis_url: &str) -> AppResult<Self> {
        let client = Client::open(redis_url)?;

        client.get_multiplexed_async_connection().await.map_err(|e| {
            error!("Redis connection test failed: {}", redis_url);
            AppError::Cache(format!("Failed to test Redis connection: {}", e))
        })?;

        debug!("Redis连接池初始化成功");
        Ok(Self { client })
    }

    /// 获取连接
    pub async fn get_connection(&self) -> AppResult<MultiplexedConnection> {
        let conn = self.client.get_multiplexed_async_connection().await?;
        Ok(conn)
    }
}

/// 全局Redis连接池实例
static REDIS_POOL: OnceCell<RedisConnectionPool> = OnceCell::new();

/// 初始化Redis连接池
pub async fn init_redis_pool(redis_url: &str) -> AppResult<()> {
    if REDIS_POOL.get().is_some() {
        return Ok(());
    }
    let pool = RedisConnectionPool::new(redis_url).await?;
    REDIS_POOL
        .set(pool)
        .map_err(|_| AppError::Cache("Failed to initialize Redis connection pool".to_string()))?;

    info!("Redis connection pool initialized successfully ！");
    Ok(())
}

/// 获取Redis连接池实例
pub fn get_redis_pool() -> AppResult<&'static RedisConnectionPool> {
    REDIS_POOL
        .get()
        .ok_or_else(|| AppError::Cache("Redis连接池未初始化，请先调用 init_redis_pool()".to_string()))
}

pub async fn get_redis_connection() -> AppResult<MultiplexedConnection> {
    get_redis_pool()?.get_connection().await
}

/// 清理Redis连接池
pub async fn cleanup_redis_pool() -> AppResult<()> {
    if get_redis_pool().is_ok() {
        info!("Redis连接池清理完成");
    }
    Ok(())
}
