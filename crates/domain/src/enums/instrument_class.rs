//! 标的类别

use serde::{Deserialize, Serialize};
use std::fmt;

/// 标的类别：股票或加密货币
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InstrumentClass {
    Equity,
    Crypto,
}

impl InstrumentClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstrumentClass::Equity => "EQUITY",
            InstrumentClass::Crypto => "CRYPTO",
        }
    }

    /// 只有股票才有 ESG 评分
    pub fn has_sustainability(&self) -> bool {
        matches!(self, InstrumentClass::Equity)
    }

    /// 未显式标注类别时按代码推断：`-USD` 结尾视为加密货币
    pub fn infer(symbol: &str) -> Self {
        if symbol.to_ascii_uppercase().ends_with("-USD") {
            InstrumentClass::Crypto
        } else {
            InstrumentClass::Equity
        }
    }
}

impl std::str::FromStr for InstrumentClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "equity" | "stock" | "share" => Ok(InstrumentClass::Equity),
            "crypto" | "cryptocurrency" => Ok(InstrumentClass::Crypto),
            other => Err(format!("Unknown instrument class: {}", other)),
        }
    }
}

impl fmt::Display for InstrumentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_infer() {
        assert_eq!("Equity".parse::<InstrumentClass>().unwrap(), InstrumentClass::Equity);
        assert_eq!("CRYPTO".parse::<InstrumentClass>().unwrap(), InstrumentClass::Crypto);
        assert!("bond".parse::<InstrumentClass>().is_err());

        assert_eq!(InstrumentClass::infer("btc-usd"), InstrumentClass::Crypto);
        assert_eq!(InstrumentClass::infer("BRK-B"), InstrumentClass::Equity);
    }

    #[test]
    fn test_serde_uses_uppercase() {
        let json = serde_json::to_string(&InstrumentClass::Crypto).unwrap();
        assert_eq!(json, "\"CRYPTO\"");
    }
}
