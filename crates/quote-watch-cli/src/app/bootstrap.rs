//! # 应用启动引导模块
//!
//! 根据 [`AppConfig`] 组装各层组件

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use quote_watch_core::cache::init_redis_pool;
use quote_watch_core::config::{AppConfig, SnapshotBackend};
use quote_watch_core::AppError;
use quote_watch_domain::{AccountBookSource, TickerUniverse};
use quote_watch_infrastructure::{InfrastructureFactory, JsonAccountBookRepository, SnapshotState};
use quote_watch_orchestration::MarketWatchJob;
use quote_watch_services::{NotificationDispatcher, QuoteRefreshService, SnapshotService};

/// 运行期共享的组件
pub struct AppContext {
    pub config: AppConfig,
    pub job: Arc<MarketWatchJob>,
    pub snapshot_service: Arc<SnapshotService>,
}

/// 解析标的池：未配置 `TICKERS` 时使用默认的 30 个标的
pub fn ticker_universe(config: &AppConfig) -> Result<TickerUniverse> {
    match config.tickers.as_deref() {
        Some(raw) => Ok(TickerUniverse::parse(raw)
            .map_err(|e| AppError::Config(format!("TICKERS 配置无效: {}", e)))?),
        None => Ok(TickerUniverse::default()),
    }
}

pub async fn build_context(config: AppConfig) -> Result<AppContext> {
    let universe = ticker_universe(&config)?;

    if config.snapshot_backend == SnapshotBackend::Redis {
        init_redis_pool(&config.redis_url).await?;
    }

    let repository = InfrastructureFactory::create_snapshot_repository(&config);
    let source = InfrastructureFactory::create_quote_source(&config)?;
    let notifier = InfrastructureFactory::create_notifier(&config)?;
    let accounts: Arc<dyn AccountBookSource> =
        Arc::new(JsonAccountBookRepository::new(&config.accounts_file));

    // 读写两条路径共用同一份内存快照
    let state = Arc::new(SnapshotState::new());

    let refresh = QuoteRefreshService::new(source, repository.clone(), state.clone(), config.pacing);
    let job = MarketWatchJob::new(
        universe.clone(),
        refresh,
        accounts,
        NotificationDispatcher::new(notifier),
        config.job_budget,
    );
    let snapshot_service = SnapshotService::new(repository, state);

    info!(
        "组件初始化完成: 标的数={}, 刷新间隔={:?}, 时间预算={:?}",
        universe.len(),
        config.refresh_interval,
        config.job_budget
    );
    Ok(AppContext {
        config,
        job: Arc::new(job),
        snapshot_service: Arc::new(snapshot_service),
    })
}
