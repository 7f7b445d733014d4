//! 定时任务

pub mod market_watch_job;

pub use market_watch_job::{JobReport, MarketWatchJob};
