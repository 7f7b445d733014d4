//! # Quote Watch Orchestration
//!
//! 编排层：周期任务调度与行情监控任务

pub mod jobs;
pub mod scheduler;

pub use jobs::{JobReport, MarketWatchJob};
pub use scheduler::TaskScheduler;
