//! # Quote Watch Infrastructure
//!
//! 基础设施层 - 实现领域层定义的接口
//!
//! ## 职责
//!
//! 1. **行情源**: Yahoo Finance 适配器
//! 2. **数据访问**: 快照仓储（文件 / Redis / 内存）与账户簿
//! 3. **通知**: SMTP 邮件与日志通知
//! 4. **进程内状态**: 最近一份快照
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use quote_watch_infrastructure::repositories::FileSnapshotRepository;
//! use quote_watch_domain::SnapshotRepository;
//!
//! let repo = FileSnapshotRepository::new("stocks.json");
//! repo.put(&snapshot.to_blob()?).await?;
//! ```

pub mod cache;
pub mod factory;
pub mod notifiers;
pub mod quote_sources;
pub mod repositories;

// 重新导出常用类型
pub use cache::SnapshotState;
pub use factory::InfrastructureFactory;
pub use notifiers::{LogNotifier, SmtpNotifier};
pub use quote_sources::{YahooConfig, YahooQuoteSource};
pub use repositories::{
    FileSnapshotRepository, InMemorySnapshotRepository, JsonAccountBookRepository,
    RedisSnapshotRepository,
};
