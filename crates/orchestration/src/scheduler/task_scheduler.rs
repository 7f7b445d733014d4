use std::collections::HashMap;
use std::future::Future;

use anyhow::{anyhow, Result};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::{info, warn};

/// 周期任务的最小间隔
pub const MIN_TASK_INTERVAL: Duration = Duration::from_millis(100);

/// 周期任务调度器
///
/// 每个任务一个 tokio task，本轮执行完才会等待下一次 tick，
/// 所以同一任务不会重叠执行；错过的 tick 顺延而不是补发
pub struct TaskScheduler {
    periodic_tasks: HashMap<String, JoinHandle<()>>,
    shutdown_sender: broadcast::Sender<()>,
}

impl TaskScheduler {
    pub fn new() -> Self {
        let (shutdown_sender, _) = broadcast::channel(16);
        Self {
            periodic_tasks: HashMap::new(),
            shutdown_sender,
        }
    }
}

impl Default for TaskScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskScheduler {
    /// 注册周期任务
    ///
    /// `run_immediately` 为 true 时注册后立即执行一次，否则等满一个周期
    pub fn add_periodic_task<F, Fut>(
        &mut self,
        name: &str,
        every: Duration,
        run_immediately: bool,
        task_fn: F,
    ) -> Result<()>
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if every < MIN_TASK_INTERVAL {
            return Err(anyhow!(
                "任务 {} 的间隔 {:?} 小于最小值 {:?}",
                name,
                every,
                MIN_TASK_INTERVAL
            ));
        }
        if self.periodic_tasks.contains_key(name) {
            return Err(anyhow!("任务 {} 已注册", name));
        }

        let start = if run_immediately {
            Instant::now()
        } else {
            Instant::now() + every
        };
        let mut interval_timer = interval_at(start, every);
        interval_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut shutdown_receiver = self.shutdown_sender.subscribe();
        let task_name = name.to_string();
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = interval_timer.tick() => {
                        task_fn().await;
                    }
                    _ = shutdown_receiver.recv() => {
                        info!("Periodic task {} is shutting down", task_name);
                        break;
                    }
                }
            }
        });

        info!("周期任务已注册: {} every {:?}", name, every);
        self.periodic_tasks.insert(name.to_string(), handle);
        Ok(())
    }

    pub fn task_names(&self) -> Vec<&str> {
        self.periodic_tasks.keys().map(String::as_str).collect()
    }

    /// 通知所有任务退出，并等待正在执行的一轮结束
    pub async fn shutdown(self) {
        // 发送关闭信号
        let _ = self.shutdown_sender.send(());

        for (name, handle) in self.periodic_tasks {
            if let Err(e) = handle.await {
                warn!("Periodic task {} exited abnormally: {}", name, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_rejects_too_short_interval() {
        let mut scheduler = TaskScheduler::new();
        let result = scheduler.add_periodic_task("fast", Duration::from_millis(10), true, || async {});
        assert!(result.is_err());
        assert!(scheduler.task_names().is_empty());
    }

    #[tokio::test]
    async fn test_runs_without_overlap_and_stops() {
        let runs = Arc::new(AtomicUsize::new(0));
        let running = Arc::new(AtomicUsize::new(0));
        let overlapped = Arc::new(AtomicUsize::new(0));

        let mut scheduler = TaskScheduler::new();
        {
            let (runs, running, overlapped) = (runs.clone(), running.clone(), overlapped.clone());
            scheduler
                .add_periodic_task("job", Duration::from_millis(100), true, move || {
                    let (runs, running, overlapped) =
                        (runs.clone(), running.clone(), overlapped.clone());
                    async move {
                        if running.fetch_add(1, Ordering::SeqCst) > 0 {
                            overlapped.fetch_add(1, Ordering::SeqCst);
                        }
                        // 单次执行比周期更长
                        tokio::time::sleep(Duration::from_millis(150)).await;
                        running.fetch_sub(1, Ordering::SeqCst);
                        runs.fetch_add(1, Ordering::SeqCst);
                    }
                })
                .unwrap();
        }
        assert!(scheduler
            .add_periodic_task("job", Duration::from_secs(1), false, || async {})
            .is_err());

        tokio::time::sleep(Duration::from_millis(400)).await;
        scheduler.shutdown().await;

        let total = runs.load(Ordering::SeqCst);
        assert!(total >= 1, "runs={}", total);
        assert_eq!(overlapped.load(Ordering::SeqCst), 0);

        // 关闭后不再执行
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(runs.load(Ordering::SeqCst), total);
    }
}
