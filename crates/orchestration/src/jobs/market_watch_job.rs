//! 行情监控任务
//!
//! 一次执行 = 刷新快照 → 加载账户簿 → 评估提醒 → 发送通知，
//! 整体受时间预算约束

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use tracing::{error, info, warn};

use quote_watch_domain::{AccountBookSource, TickerUniverse};
use quote_watch_services::{AlertEvaluator, NotificationDispatcher, QuoteRefreshService};

/// 一次任务执行的汇总
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct JobReport {
    /// 提交到快照中的标的数
    pub quotes_committed: usize,
    /// 刷新是否因行情源错误提前结束
    pub aborted: bool,
    pub skipped: usize,
    pub triggered: usize,
    pub sent: usize,
    pub failed: usize,
}

pub struct MarketWatchJob {
    universe: TickerUniverse,
    refresh: QuoteRefreshService,
    accounts: Arc<dyn AccountBookSource>,
    evaluator: AlertEvaluator,
    dispatcher: NotificationDispatcher,
    budget: Duration,
}

impl MarketWatchJob {
    pub fn new(
        universe: TickerUniverse,
        refresh: QuoteRefreshService,
        accounts: Arc<dyn AccountBookSource>,
        dispatcher: NotificationDispatcher,
        budget: Duration,
    ) -> Self {
        Self {
            universe,
            refresh,
            accounts,
            evaluator: AlertEvaluator::new(),
            dispatcher,
            budget,
        }
    }

    /// 在时间预算内执行一次，超时即放弃本次执行
    pub async fn run(&self) -> Result<JobReport> {
        match tokio::time::timeout(self.budget, self.run_pass()).await {
            Ok(result) => result,
            Err(_) => Err(anyhow!("任务超过时间预算 {:?}，本次执行已放弃", self.budget)),
        }
    }

    /// 供调度器调用，结果只记日志
    pub async fn run_logged(&self) {
        let started = Instant::now();
        match self.run().await {
            Ok(report) => info!(
                "✅ 行情监控任务完成 ({:?}): {:?}",
                started.elapsed(),
                report
            ),
            Err(e) => error!("❌ 行情监控任务失败 ({:?}): {:#}", started.elapsed(), e),
        }
    }

    async fn run_pass(&self) -> Result<JobReport> {
        let outcome = self
            .refresh
            .refresh(&self.universe)
            .await
            .context("快照提交失败")?;

        let mut report = JobReport {
            quotes_committed: outcome.snapshot.len(),
            aborted: !outcome.is_complete(),
            skipped: outcome.skipped.len(),
            ..Default::default()
        };

        let book = match self.accounts.load().await {
            Ok(book) => book,
            Err(e) => {
                warn!("账户簿加载失败，本轮跳过提醒评估: {}", e);
                return Ok(report);
            }
        };

        let triggered = self.evaluator.evaluate_book(&outcome.snapshot, &book);
        report.triggered = triggered.len();

        let dispatch = self.dispatcher.dispatch(&triggered).await;
        report.sent = dispatch.sent;
        report.failed = dispatch.failed;
        Ok(report)
    }
}
