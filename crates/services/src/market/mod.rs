//! 行情刷新与快照读取

pub mod refresh_service;
pub mod snapshot_service;

pub use refresh_service::{QuoteRefreshService, RefreshOutcome};
pub use snapshot_service::{serialize, SnapshotService};
