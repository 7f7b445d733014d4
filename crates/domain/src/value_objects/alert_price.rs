//! 提醒目标价 - 可能是数字，也可能是文本

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;
use serde_json::Value;

use crate::errors::QuoteWatchError;

/// 原样保存的目标价，评估时再转换成十进制
///
/// 账户数据由外部维护，目标价可能写成 `150`、`"150.25"` 甚至 `"abc"`，
/// 转换失败只跳过这一条提醒。
/// 反序列化从不失败：`null`、布尔、对象等落入 `Other`，
/// 超出 f64 范围的数字按原文保存为 `Text`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AlertPrice {
    Number(serde_json::Number),
    Text(String),
    Other(Value),
}

impl Default for AlertPrice {
    /// 缺失字段
    fn default() -> Self {
        AlertPrice::Other(Value::Null)
    }
}

impl<'de> Deserialize<'de> for AlertPrice {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // 先取原文，避免单个坏值让整份账户数据解析失败
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        Ok(match serde_json::from_str::<Value>(raw.get()) {
            Ok(Value::Number(n)) => AlertPrice::Number(n),
            Ok(Value::String(s)) => AlertPrice::Text(s),
            Ok(other) => AlertPrice::Other(other),
            Err(_) => AlertPrice::Text(raw.get().to_string()),
        })
    }
}

impl AlertPrice {
    pub fn to_decimal(&self) -> Result<Decimal, QuoteWatchError> {
        let raw = match self {
            AlertPrice::Number(n) => n.to_string(),
            AlertPrice::Text(s) => s.trim().to_string(),
            AlertPrice::Other(v) => return Err(QuoteWatchError::MalformedAlertValue(v.to_string())),
        };
        Decimal::from_str(&raw)
            .or_else(|_| Decimal::from_scientific(&raw))
            .map_err(|_| QuoteWatchError::MalformedAlertValue(raw))
    }
}

impl fmt::Display for AlertPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertPrice::Number(n) => write!(f, "{}", n),
            AlertPrice::Text(s) => write!(f, "{}", s),
            AlertPrice::Other(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for AlertPrice {
    fn from(value: &str) -> Self {
        AlertPrice::Text(value.to_string())
    }
}

impl From<String> for AlertPrice {
    fn from(value: String) -> Self {
        AlertPrice::Text(value)
    }
}

impl From<i64> for AlertPrice {
    fn from(value: i64) -> Self {
        AlertPrice::Number(value.into())
    }
}

impl From<Decimal> for AlertPrice {
    fn from(value: Decimal) -> Self {
        AlertPrice::Text(value.to_string())
    }
}
