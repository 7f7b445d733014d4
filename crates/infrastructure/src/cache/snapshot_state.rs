//! 进程内的最近一份快照
//!
//! 读路径在持久化存储不可用时回退到这里，冷启动时为空

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use quote_watch_domain::Snapshot;

/// 整体替换的快照状态
///
/// 持有 `Arc<Snapshot>`，替换时只交换指针，读者拿到的永远是某一份完整快照
#[derive(Debug, Default)]
pub struct SnapshotState {
    current: RwLock<Arc<Snapshot>>,
}

impl SnapshotState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前快照（可能为空）
    pub async fn current(&self) -> Arc<Snapshot> {
        self.current.read().await.clone()
    }

    pub async fn replace(&self, snapshot: Snapshot) {
        let snapshot = Arc::new(snapshot);
        debug!("内存快照已替换: {} 个标的", snapshot.len());
        *self.current.write().await = snapshot;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_starts_empty_and_replaces_whole() {
        let state = SnapshotState::new();
        assert!(state.current().await.is_empty());

        let before = state.current().await;
        let blob = r#"{"AAPL": {"instrument_class": "EQUITY", "symbol": "AAPL",
            "display_name": "Apple Inc.", "current_price": 150.0, "currency": "USD",
            "recent_history": [{"open": 152.0, "high": 153.0, "low": 151.0, "close": 152.5}]}}"#;
        state.replace(Snapshot::from_blob(blob).unwrap()).await;

        assert!(before.is_empty());
        assert_eq!(state.current().await.len(), 1);
    }
}
