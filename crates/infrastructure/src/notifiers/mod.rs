//! 通知发送实现

pub mod log_notifier;
pub mod smtp_notifier;

pub use log_notifier::LogNotifier;
pub use smtp_notifier::SmtpNotifier;
