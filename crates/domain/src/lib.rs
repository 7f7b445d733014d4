//! # Quote Watch Domain
//!
//! 领域模型层 - 纯粹的业务数据与接口，不依赖任何基础设施
//!
//! ## 模块组织
//!
//! - `entities`: 行情记录、快照、持仓、提醒、所有者
//! - `value_objects`: 提醒目标价、标的池
//! - `enums`: 标的类别
//! - `traits`: 行情源、快照仓储、目录、通知等外部协作方接口
//! - `errors`: 统一错误分类
//!
//! ## 使用示例
//!
//! ```rust
//! use quote_watch_domain::{Alert, AlertPrice, Holding};
//!
//! let holding = Holding::new("AAPL", vec![Alert::new("150.25")]);
//! let target = holding.alerts[0].target_price.to_decimal().unwrap();
//! assert_eq!(target.to_string(), "150.25");
//! assert!(AlertPrice::from("abc").to_decimal().is_err());
//! ```

pub mod entities;
pub mod enums;
pub mod errors;
pub mod traits;
pub mod value_objects;

// 重新导出核心类型
pub use entities::{
    AccountBook, Advisor, Alert, Client, Holding, HoldingOwner, Manager, PriceBar, QuoteRecord,
    Snapshot, SustainabilityScores, TriggeredAlert,
};
pub use enums::InstrumentClass;
pub use errors::QuoteWatchError;
pub use traits::{AccountBookSource, Directory, Notifier, QuoteSource, SnapshotRepository};
pub use value_objects::{AlertPrice, TickerSpec, TickerUniverse};
