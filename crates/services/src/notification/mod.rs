//! 通知分发

pub mod dispatcher;

pub use dispatcher::{DispatchReport, NotificationDispatcher};
