//! # Quote Watch Core
//!
//! 核心基础设施：配置、缓存连接、日志、优雅关闭

pub mod cache;
pub mod config;
pub mod error;
pub mod logger;

pub use error::{AppError, AppResult};
