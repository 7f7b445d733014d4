//! 通知发送接口

use async_trait::async_trait;

use crate::errors::QuoteWatchError;

/// 尽力而为的邮件发送
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;

    /// 失败时返回 [`QuoteWatchError::DispatchFailure`]
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), QuoteWatchError>;
}
