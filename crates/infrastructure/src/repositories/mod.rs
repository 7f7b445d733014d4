//! 数据访问层模块
//!
//! 实现 domain 层定义的快照仓储与账户簿接口

pub mod account_book_repository;
pub mod file_snapshot_repository;
pub mod memory_snapshot_repository;
pub mod redis_snapshot_repository;

pub use account_book_repository::JsonAccountBookRepository;
pub use file_snapshot_repository::FileSnapshotRepository;
pub use memory_snapshot_repository::InMemorySnapshotRepository;
pub use redis_snapshot_repository::RedisSnapshotRepository;
