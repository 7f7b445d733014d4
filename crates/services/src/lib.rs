//! # Quote Watch Services
//!
//! 应用服务层 - 协调领域对象和基础设施，实现业务流程
//!
//! ## 架构位置
//!
//! ```text
//! orchestration (调度) → services (业务协调) → domain + infrastructure
//! ```
//!
//! ## 模块
//!
//! - `market`: 行情刷新（唯一的快照写入方）与快照读取
//! - `alert`: 价格提醒评估引擎
//! - `notification`: 提醒邮件分发
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use quote_watch_services::{AlertEvaluator, NotificationDispatcher, QuoteRefreshService};
//!
//! let outcome = refresh_service.refresh(&universe).await?;
//! let triggered = AlertEvaluator::new().evaluate_book(&outcome.snapshot, &book);
//! let report = dispatcher.dispatch(&triggered).await;
//! ```

pub mod alert;
pub mod market;
pub mod notification;

// 重新导出常用服务
pub use alert::AlertEvaluator;
pub use market::{QuoteRefreshService, RefreshOutcome, SnapshotService};
pub use notification::{DispatchReport, NotificationDispatcher};
