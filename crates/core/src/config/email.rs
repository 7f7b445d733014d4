use std::time::Duration;

use lettre::transport::smtp::authentication::Credentials;
use lettre::SmtpTransport;

use crate::config::environment::{env_or_default, env_u64};
use crate::error::{AppError, AppResult};

/// SMTP 发送配置
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub from: String,
    pub username: String,
    pub password: String,
    /// SMTP 命令超时
    pub smtp_timeout: Duration,
}

impl EmailConfig {
    pub fn from_env() -> AppResult<Self> {
        let smtp_port = env_or_default("EMAIL_SMTP_PORT", "587");
        let smtp_port = smtp_port
            .parse::<u16>()
            .map_err(|e| AppError::Config(format!("EMAIL_SMTP_PORT={} 无效: {}", smtp_port, e)))?;

        let username = env_or_default("EMAIL_SEND_USERNAME", "");
        Ok(Self {
            smtp_server: env_or_default("EMAIL_SMTP_SERVER", "smtp.gmail.com"),
            smtp_port,
            // 未单独配置发件人时使用登录账号
            from: env_or_default("EMAIL_FROM", &username),
            username,
            password: env_or_default("EMAIL_SEND_PASSWORD", ""),
            smtp_timeout: Duration::from_secs(env_u64("EMAIL_SMTP_TIMEOUT_SECS", 10)?),
        })
    }

    /// 构建 STARTTLS 的 SMTP 客户端
    pub fn build_transport(&self) -> AppResult<SmtpTransport> {
        let creds = Credentials::new(self.username.clone(), self.password.clone());
        let transport = SmtpTransport::starttls_relay(&self.smtp_server)
            .map_err(|e| AppError::Email(format!("SMTP relay {} 无效: {}", self.smtp_server, e)))?
            .port(self.smtp_port)
            .credentials(creds)
            .timeout(Some(self.smtp_timeout))
            .build();
        Ok(transport)
    }
}
