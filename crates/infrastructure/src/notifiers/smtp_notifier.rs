//! SMTP 邮件通知

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header;
use lettre::{Message, SmtpTransport, Transport};
use tracing::info;

use quote_watch_core::config::EmailConfig;
use quote_watch_core::AppResult;
use quote_watch_domain::{Notifier, QuoteWatchError};

/// 基于 lettre 的 STARTTLS 邮件发送
///
/// lettre 的 SMTP 发送是同步阻塞的，放到独立的阻塞任务中执行，
/// 外层再套一个总体超时
pub struct SmtpNotifier {
    transport: SmtpTransport,
    from: String,
    total_timeout: Duration,
}

impl SmtpNotifier {
    pub fn new(config: &EmailConfig) -> AppResult<Self> {
        Ok(Self {
            transport: config.build_transport()?,
            from: config.from.clone(),
            // 比 SMTP 命令超时多留 5 秒
            total_timeout: config.smtp_timeout + Duration::from_secs(5),
        })
    }
}

fn build_message(from: &str, to: &str, subject: &str, body: &str) -> Result<Message, String> {
    Message::builder()
        .from(from.parse().map_err(|e| format!("发件人地址无效 {}: {}", from, e))?)
        .to(to.parse().map_err(|e| format!("收件人地址无效 {}: {}", to, e))?)
        .subject(subject)
        .header(header::ContentType::TEXT_PLAIN)
        .body(body.to_string())
        .map_err(|e| e.to_string())
}

#[async_trait]
impl Notifier for SmtpNotifier {
    fn name(&self) -> &str {
        "smtp"
    }

    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), QuoteWatchError> {
        let failure = |message: String| QuoteWatchError::DispatchFailure {
            to: to.to_string(),
            message,
        };

        let email = build_message(&self.from, to, subject, body).map_err(failure)?;
        let transport = self.transport.clone();
        let task = tokio::task::spawn_blocking(move || transport.send(&email));

        match tokio::time::timeout(self.total_timeout, task).await {
            Ok(Ok(Ok(_))) => {
                info!("邮件已发送: to={}, subject={}", to, subject);
                Ok(())
            }
            Ok(Ok(Err(e))) => Err(failure(e.to_string())),
            Ok(Err(e)) => Err(failure(format!("发送任务异常: {}", e))),
            Err(_) => Err(failure(format!("发送超时 ({:?})", self.total_timeout))),
        }
    }
}
