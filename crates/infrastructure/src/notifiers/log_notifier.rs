//! 只记日志的通知实现，本地环境默认使用

use async_trait::async_trait;
use tracing::info;

use quote_watch_domain::{Notifier, QuoteWatchError};

#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), QuoteWatchError> {
        info!("📨 [log notifier] to={} subject={} body={}", to, subject, body);
        Ok(())
    }
}
