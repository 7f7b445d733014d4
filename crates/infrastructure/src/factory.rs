//! 基础设施工厂
//!
//! 根据配置创建快照仓储、通知器和行情源，支持配置化切换

use std::sync::Arc;

use quote_watch_core::config::{AppConfig, EmailConfig, NotifierKind, SnapshotBackend};
use quote_watch_core::AppResult;
use quote_watch_domain::{Notifier, QuoteSource, SnapshotRepository};
use tracing::info;

use crate::notifiers::{LogNotifier, SmtpNotifier};
use crate::quote_sources::{YahooConfig, YahooQuoteSource};
use crate::repositories::{
    FileSnapshotRepository, InMemorySnapshotRepository, RedisSnapshotRepository,
};

pub struct InfrastructureFactory;

impl InfrastructureFactory {
    /// 创建快照仓储
    ///
    /// Redis 后端要求调用方已经执行过 `init_redis_pool`
    pub fn create_snapshot_repository(config: &AppConfig) -> Arc<dyn SnapshotRepository> {
        let repo: Arc<dyn SnapshotRepository> = match config.snapshot_backend {
            SnapshotBackend::File => Arc::new(FileSnapshotRepository::new(&config.snapshot_file)),
            SnapshotBackend::Redis => {
                Arc::new(RedisSnapshotRepository::new(&config.snapshot_redis_key))
            }
            SnapshotBackend::Memory => Arc::new(InMemorySnapshotRepository::new()),
        };
        info!("快照仓储: {}", repo.name());
        repo
    }

    /// 创建通知器，SMTP 配置只在需要时读取
    pub fn create_notifier(config: &AppConfig) -> AppResult<Arc<dyn Notifier>> {
        let notifier: Arc<dyn Notifier> = match config.notifier {
            NotifierKind::Smtp => Arc::new(SmtpNotifier::new(&EmailConfig::from_env()?)?),
            NotifierKind::Log => Arc::new(LogNotifier),
        };
        info!("通知方式: {}", notifier.name());
        Ok(notifier)
    }

    pub fn create_quote_source(config: &AppConfig) -> AppResult<Arc<dyn QuoteSource>> {
        let source = YahooQuoteSource::new(YahooConfig {
            base_url: config.yahoo_base_url.clone(),
            timeout: config.quote_http_timeout,
        })?;
        Ok(Arc::new(source))
    }
}
