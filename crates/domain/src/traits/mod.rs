//! 领域接口模块
//!
//! 定义领域层的抽象接口，由基础设施层实现

pub mod account_book_source;
pub mod directory;
pub mod notifier;
pub mod quote_source;
pub mod snapshot_repository;

pub use account_book_source::AccountBookSource;
pub use directory::Directory;
pub use notifier::Notifier;
pub use quote_source::QuoteSource;
pub use snapshot_repository::SnapshotRepository;
