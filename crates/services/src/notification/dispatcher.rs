//! 提醒通知分发

use std::sync::Arc;

use tracing::{error, info};

use quote_watch_domain::{Notifier, QuoteWatchError, TriggeredAlert};

/// 一批通知的发送结果
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    pub sent: usize,
    pub failed: usize,
}

pub struct NotificationDispatcher {
    notifier: Arc<dyn Notifier>,
}

impl NotificationDispatcher {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// 为一条触发的提醒发送一封邮件
    pub async fn notify(&self, trigger: &TriggeredAlert) -> Result<(), QuoteWatchError> {
        self.notifier
            .send(&trigger.recipient_email, &trigger.subject(), &trigger.body())
            .await
    }

    /// 逐条发送，单条失败只记录日志，不影响其余通知
    pub async fn dispatch(&self, triggers: &[TriggeredAlert]) -> DispatchReport {
        let mut report = DispatchReport::default();
        for trigger in triggers {
            match self.notify(trigger).await {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    error!("通知发送失败 ({}): {}", trigger.symbol, e);
                    report.failed += 1;
                }
            }
        }
        if !triggers.is_empty() {
            info!(
                "📨 通知分发完成 via {}: sent={}, failed={}",
                self.notifier.name(),
                report.sent,
                report.failed
            );
        }
        report
    }
}
