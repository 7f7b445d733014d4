//! 行情刷新服务
//!
//! 按标的池顺序逐个拉取行情，组装快照并整体提交。
//! 这是快照仓储唯一的写入方

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{error, info, warn};

use quote_watch_domain::{
    QuoteSource, QuoteWatchError, Snapshot, SnapshotRepository, TickerUniverse,
};
use quote_watch_infrastructure::SnapshotState;

/// 一轮刷新的结果
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    /// 已提交的快照（中途中止时是部分快照）
    pub snapshot: Snapshot,
    /// 中止本轮的错误，完整跑完时为 None
    pub aborted: Option<QuoteWatchError>,
    /// 因历史为空被跳过的标的
    pub skipped: Vec<String>,
}

impl RefreshOutcome {
    pub fn is_complete(&self) -> bool {
        self.aborted.is_none()
    }
}

pub struct QuoteRefreshService {
    source: Arc<dyn QuoteSource>,
    repository: Arc<dyn SnapshotRepository>,
    state: Arc<SnapshotState>,
    pacing: Duration,
}

impl QuoteRefreshService {
    pub fn new(
        source: Arc<dyn QuoteSource>,
        repository: Arc<dyn SnapshotRepository>,
        state: Arc<SnapshotState>,
        pacing: Duration,
    ) -> Self {
        Self {
            source,
            repository,
            state,
            pacing,
        }
    }

    /// 执行一轮刷新
    ///
    /// 任意一个标的拉取失败都会结束本轮，已拿到的部分照常提交；
    /// 不做重试，下一次调度就是重试。只有写入仓储失败才返回错误
    pub async fn refresh(&self, universe: &TickerUniverse) -> Result<RefreshOutcome, QuoteWatchError> {
        info!(
            "🔄 开始刷新行情: source={}, 标的数={}",
            self.source.name(),
            universe.len()
        );

        let mut snapshot = Snapshot::new();
        let mut skipped = Vec::new();
        let mut aborted = None;

        for (i, spec) in universe.iter().enumerate() {
            if i > 0 && !self.pacing.is_zero() {
                sleep(self.pacing).await;
            }

            match self.source.fetch(&spec.symbol, spec.class).await {
                Ok(record) if record.recent_history.is_empty() => {
                    warn!("{} 没有历史K线，跳过", spec.symbol);
                    skipped.push(spec.symbol.clone());
                }
                Ok(record) => snapshot.insert(record),
                Err(e) => {
                    error!(
                        "获取 {} 行情失败，结束本轮刷新 (已获取 {}/{}): {}",
                        spec.symbol,
                        snapshot.len(),
                        universe.len(),
                        e
                    );
                    aborted = Some(e);
                    break;
                }
            }
        }

        self.commit(&snapshot).await?;

        info!(
            "✅ 快照已提交: {} 个标的, 跳过 {}, 中止={}",
            snapshot.len(),
            skipped.len(),
            aborted.is_some()
        );
        Ok(RefreshOutcome {
            snapshot,
            aborted,
            skipped,
        })
    }

    /// 无条件覆盖上一份快照，成功后同步替换内存快照
    async fn commit(&self, snapshot: &Snapshot) -> Result<(), QuoteWatchError> {
        let blob = snapshot.to_blob()?;
        self.repository.put(&blob).await.map_err(|e| {
            error!("快照写入 {} 失败: {}", self.repository.name(), e);
            e
        })?;
        self.state.replace(snapshot.clone()).await;
        Ok(())
    }
}
