//! 应用配置
//!
//! 启动时从环境变量（可由 `.env` 提供）一次性读取，之后以只读方式注入各层

use std::time::Duration;

use crate::config::environment::{env_is_true, env_opt, env_or_default, env_u64};
use crate::error::{AppError, AppResult};

/// 刷新间隔下限（秒）
pub const MIN_REFRESH_INTERVAL_SECS: u64 = 60;

/// 快照存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotBackend {
    File,
    Redis,
    Memory,
}

impl SnapshotBackend {
    pub fn parse(raw: &str) -> AppResult<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            other => Err(AppError::Config(format!("未知的 SNAPSHOT_BACKEND: {}", other))),
        }
    }
}

/// 通知发送方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifierKind {
    Smtp,
    Log,
}

impl NotifierKind {
    pub fn parse(raw: &str) -> AppResult<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "smtp" | "email" => Ok(Self::Smtp),
            "log" => Ok(Self::Log),
            other => Err(AppError::Config(format!("未知的 NOTIFIER: {}", other))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app_env: String,
    /// `TICKERS` 原始值，None 表示使用默认标的池
    pub tickers: Option<String>,
    pub refresh_interval: Duration,
    /// 两次行情请求之间的固定间隔
    pub pacing: Duration,
    /// 单次调度任务的整体时间预算
    pub job_budget: Duration,
    pub run_on_startup: bool,
    pub yahoo_base_url: String,
    pub quote_http_timeout: Duration,
    pub snapshot_backend: SnapshotBackend,
    pub snapshot_file: String,
    pub snapshot_redis_key: String,
    pub redis_url: String,
    pub accounts_file: String,
    pub notifier: NotifierKind,
    pub http_bind: String,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        let app_env = env_or_default("APP_ENV", "local");

        let refresh_secs = env_u64("QUOTE_REFRESH_INTERVAL_SECS", 3600)?;
        if refresh_secs < MIN_REFRESH_INTERVAL_SECS {
            return Err(AppError::Config(format!(
                "QUOTE_REFRESH_INTERVAL_SECS 不能小于 {} 秒, 当前: {}",
                MIN_REFRESH_INTERVAL_SECS, refresh_secs
            )));
        }

        let default_notifier = if app_env == "local" { "log" } else { "smtp" };

        Ok(Self {
            tickers: env_opt("TICKERS"),
            refresh_interval: Duration::from_secs(refresh_secs),
            pacing: Duration::from_millis(env_u64("QUOTE_PACING_MILLIS", 2000)?),
            job_budget: Duration::from_secs(env_u64("JOB_BUDGET_SECS", 120)?),
            run_on_startup: env_is_true("RUN_ON_STARTUP", true),
            yahoo_base_url: env_or_default("YAHOO_BASE_URL", "https://query1.finance.yahoo.com"),
            quote_http_timeout: Duration::from_secs(env_u64("QUOTE_HTTP_TIMEOUT_SECS", 10)?),
            snapshot_backend: SnapshotBackend::parse(&env_or_default("SNAPSHOT_BACKEND", "file"))?,
            snapshot_file: env_or_default("SNAPSHOT_FILE", "stocks.json"),
            snapshot_redis_key: env_or_default("SNAPSHOT_REDIS_KEY", "stocks.json"),
            redis_url: env_or_default("REDIS_HOST", "redis://127.0.0.1:6379/"),
            accounts_file: env_or_default("ACCOUNTS_FILE", "accounts.json"),
            notifier: NotifierKind::parse(&env_or_default("NOTIFIER", default_notifier))?,
            http_bind: env_or_default("HTTP_BIND", "0.0.0.0:8080"),
            app_env,
        })
    }
}
