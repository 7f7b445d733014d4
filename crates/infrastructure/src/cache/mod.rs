//! 进程内缓存

pub mod snapshot_state;

pub use snapshot_state::SnapshotState;
