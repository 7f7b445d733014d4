//! 价格提醒

pub mod alert_evaluator;

pub use alert_evaluator::{crosses, AlertEvaluator};
