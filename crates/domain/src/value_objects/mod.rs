//! 值对象模块
//!
//! 值对象是不可变的、无身份标识的领域概念

pub mod alert_price;
pub mod ticker_universe;

pub use alert_price::AlertPrice;
pub use ticker_universe::{TickerSpec, TickerUniverse};
