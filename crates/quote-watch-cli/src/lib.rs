//! # Quote Watch CLI
//!
//! 行情监控主程序入口

use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use once_cell::sync::Lazy;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Mutex};
use tracing::{error, info};

use quote_watch_core::config::{AppConfig, ShutdownConfig, ShutdownManager};
use quote_watch_orchestration::TaskScheduler;

pub mod app;

use app::bootstrap::{build_context, AppContext};

#[derive(Debug, Parser)]
#[command(name = "quote-watch", version, about = "定时抓取行情、缓存快照并发送价格提醒")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// 启动调度器和快照接口，直到收到退出信号（默认）
    Serve,
    /// 执行一次 刷新→评估→通知 后退出
    Refresh,
    /// 打印当前快照的 JSON 后退出
    Snapshot,
}

/// 应用初始化
pub fn app_init() -> Result<()> {
    // 加载环境变量
    dotenv().ok();

    // 设置日志
    quote_watch_core::logger::setup_logging()?;

    info!("应用初始化完成");
    Ok(())
}

/// 全局调度器，关闭钩子从这里取走
static SCHEDULER: Lazy<Mutex<Option<TaskScheduler>>> = Lazy::new(|| Mutex::new(None));

/// 运行主程序
pub async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::from_env()?;
    let context = build_context(config).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(context).await,
        Command::Refresh => {
            let report = context.job.run().await?;
            info!("单次执行完成: {:?}", report);
            Ok(())
        }
        Command::Snapshot => {
            println!("{}", context.snapshot_service.snapshot_json().await);
            Ok(())
        }
    }
}

async fn serve(context: AppContext) -> Result<()> {
    info!("启动 Quote Watch (env={})...", context.config.app_env);

    let mut scheduler = TaskScheduler::new();
    let job = context.job.clone();
    scheduler.add_periodic_task(
        "market_watch",
        context.config.refresh_interval,
        context.config.run_on_startup,
        move || {
            let job = job.clone();
            async move { job.run_logged().await }
        },
    )?;
    *SCHEDULER.lock().await = Some(scheduler);

    let listener = TcpListener::bind(&context.config.http_bind)
        .await
        .map_err(|e| anyhow!("无法监听 {}: {}", context.config.http_bind, e))?;
    let (http_stop_tx, http_stop_rx) = oneshot::channel::<()>();
    let http_server = tokio::spawn(app::http_server::serve(
        listener,
        context.snapshot_service.clone(),
        async move {
            let _ = http_stop_rx.await;
        },
    ));

    // 等待关闭信号
    let signal = ShutdownManager::wait_for_shutdown_signal().await?;
    info!("收到关闭信号: {}", signal);

    let _ = http_stop_tx.send(());
    if let Err(e) = http_server.await {
        error!("快照接口退出异常: {}", e);
    }

    // 优雅关闭
    graceful_shutdown().await
}

/// 优雅关闭配置
#[derive(Debug, Clone)]
pub struct GracefulShutdownConfig {
    pub total_timeout_secs: u64,
    pub scheduler_shutdown_timeout_secs: u64,
    pub redis_cleanup_timeout_secs: u64,
}

impl Default for GracefulShutdownConfig {
    fn default() -> Self {
        Self {
            // 需要覆盖一次执行中的任务
            total_timeout_secs: 150,
            scheduler_shutdown_timeout_secs: 130,
            redis_cleanup_timeout_secs: 5,
        }
    }
}

/// 优雅关闭
pub async fn graceful_shutdown() -> Result<()> {
    graceful_shutdown_with_config(GracefulShutdownConfig::default()).await
}

/// 带配置的优雅关闭：先停调度器，再清理 Redis 连接池
pub async fn graceful_shutdown_with_config(config: GracefulShutdownConfig) -> Result<()> {
    info!("开始优雅关闭... 总超时: {}秒", config.total_timeout_secs);

    let manager = ShutdownManager::new(ShutdownConfig {
        total_timeout: Duration::from_secs(config.total_timeout_secs),
        hook_timeout: Duration::from_secs(
            config
                .scheduler_shutdown_timeout_secs
                .max(config.redis_cleanup_timeout_secs),
        ),
    });

    // 1) 关闭调度器
    let scheduler_secs = config.scheduler_shutdown_timeout_secs;
    manager
        .register_shutdown_hook("scheduler_shutdown", move || async move {
            let dur = Duration::from_secs(scheduler_secs);
            match tokio::time::timeout(dur, shutdown_scheduler()).await {
                Ok(()) => Ok(()),
                Err(_) => {
                    error!("调度器关闭超时 ({}秒)", scheduler_secs);
                    Ok(())
                }
            }
        })
        .await;

    // 2) 关闭 Redis
    let redis_secs = config.redis_cleanup_timeout_secs;
    manager
        .register_shutdown_hook("redis_cleanup", move || async move {
            let dur = Duration::from_secs(redis_secs);
            match tokio::time::timeout(dur, quote_watch_core::cache::cleanup_redis_pool()).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!("清理 Redis 连接池失败: {}", e),
                Err(_) => error!("Redis 清理超时 ({}秒)", redis_secs),
            }
            Ok(())
        })
        .await;

    // 统一执行关闭
    manager.shutdown().await
}

/// 关闭调度器，等待正在执行的任务结束
async fn shutdown_scheduler() {
    info!("正在关闭调度器...");
    let scheduler = SCHEDULER.lock().await.take();
    match scheduler {
        Some(scheduler) => {
            scheduler.shutdown().await;
            info!("调度器关闭完成");
        }
        None => info!("调度器未初始化，跳过关闭"),
    }
}
