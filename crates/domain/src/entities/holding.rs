//! 持仓与价格提醒

use serde::{Deserialize, Serialize};

use crate::value_objects::AlertPrice;

/// 价格提醒
///
/// 没有“已触发”标记，区间内的提醒每一轮都会再次触发
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub target_price: AlertPrice,
}

impl Alert {
    pub fn new(target_price: impl Into<AlertPrice>) -> Self {
        Self {
            id: None,
            target_price: target_price.into(),
        }
    }
}

/// 持仓：一个标的名称加上挂在它上面的提醒
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// 自由文本，与快照 key 做精确匹配
    pub instrument_symbol: String,
    #[serde(default)]
    pub alerts: Vec<Alert>,
}

impl Holding {
    pub fn new(instrument_symbol: impl Into<String>, alerts: Vec<Alert>) -> Self {
        Self {
            instrument_symbol: instrument_symbol.into(),
            alerts,
        }
    }

    pub fn has_alerts(&self) -> bool {
        !self.alerts.is_empty()
    }
}
