//! 评估结果

use rust_decimal::Decimal;

/// 一条被触发的提醒，对应一封待发送的邮件
#[derive(Debug, Clone, PartialEq)]
pub struct TriggeredAlert {
    pub recipient_email: String,
    pub symbol: String,
    pub instrument_name: String,
    /// 提醒设定的目标价
    pub triggered_price: Decimal,
}

impl TriggeredAlert {
    pub fn subject(&self) -> String {
        format!("Price alert: {}", self.instrument_name)
    }

    pub fn body(&self) -> String {
        format!(
            "Your price alert for {} ({}) was triggered at target price {}.",
            self.instrument_name, self.symbol, self.triggered_price
        )
    }
}
