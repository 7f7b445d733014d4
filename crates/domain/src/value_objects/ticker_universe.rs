//! 标的池 - 每轮刷新要抓取的 (代码, 类别) 有序列表

use std::collections::HashSet;

use crate::enums::InstrumentClass;
use crate::errors::QuoteWatchError;

const DEFAULT_EQUITIES: [&str; 20] = [
    "AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "META", "NVDA", "BRK-B", "JNJ", "V", "WMT", "PG",
    "JPM", "DIS", "HD", "MA", "XOM", "NFLX", "INTC", "PYPL",
];

const DEFAULT_CRYPTOS: [&str; 10] = [
    "BTC-USD", "ETH-USD", "BNB-USD", "ADA-USD", "SOL-USD", "XRP-USD", "DOT-USD", "LTC-USD",
    "DOGE-USD", "MATIC-USD",
];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TickerSpec {
    pub symbol: String,
    pub class: InstrumentClass,
}

impl TickerSpec {
    pub fn new(symbol: impl Into<String>, class: InstrumentClass) -> Self {
        Self {
            symbol: symbol.into(),
            class,
        }
    }
}

/// 有序、去重的标的池
#[derive(Debug, Clone, PartialEq)]
pub struct TickerUniverse {
    specs: Vec<TickerSpec>,
}

impl Default for TickerUniverse {
    /// 20 只股票在前，10 个加密货币在后
    fn default() -> Self {
        let equities = DEFAULT_EQUITIES
            .iter()
            .map(|s| TickerSpec::new(*s, InstrumentClass::Equity));
        let cryptos = DEFAULT_CRYPTOS
            .iter()
            .map(|s| TickerSpec::new(*s, InstrumentClass::Crypto));
        Self {
            specs: equities.chain(cryptos).collect(),
        }
    }
}

impl TickerUniverse {
    /// 重复代码保留第一次出现
    pub fn new(specs: Vec<TickerSpec>) -> Self {
        let mut seen = HashSet::new();
        let specs = specs
            .into_iter()
            .filter(|spec| seen.insert(spec.symbol.clone()))
            .collect();
        Self { specs }
    }

    /// 解析 `AAPL:equity,BTC-USD:crypto,MSFT` 形式的配置
    ///
    /// 省略类别时按代码推断：以 `-USD` 结尾视为加密货币
    pub fn parse(raw: &str) -> Result<Self, QuoteWatchError> {
        let mut specs = Vec::new();
        for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (symbol, class) = match entry.split_once(':') {
                Some((symbol, class)) => {
                    let class = class
                        .trim()
                        .parse::<InstrumentClass>()
                        .map_err(|_| QuoteWatchError::InvalidTickerSpec(entry.to_string()))?;
                    (symbol.trim(), class)
                }
                None => (entry, InstrumentClass::infer(entry)),
            };
            if symbol.is_empty() || symbol.contains(char::is_whitespace) {
                return Err(QuoteWatchError::InvalidTickerSpec(entry.to_string()));
            }
            specs.push(TickerSpec::new(symbol, class));
        }

        if specs.is_empty() {
            return Err(QuoteWatchError::InvalidTickerSpec(raw.to_string()));
        }
        Ok(Self::new(specs))
    }

    pub fn iter(&self) -> impl Iterator<Item = &TickerSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
