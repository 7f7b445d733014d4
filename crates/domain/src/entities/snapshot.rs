//! 行情快照 - 代码到最新行情的完整映射

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entities::QuoteRecord;
use crate::errors::QuoteWatchError;

/// 行情快照
///
/// 持久化格式就是一个 JSON 对象：key 为标的代码，value 为 [`QuoteRecord`]。
/// 使用 BTreeMap 保证遍历与序列化顺序稳定
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    quotes: BTreeMap<String, QuoteRecord>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以记录自身的 symbol 为 key 写入，已存在则整体覆盖
    pub fn insert(&mut self, record: QuoteRecord) {
        self.quotes.insert(record.symbol.clone(), record);
    }

    /// 按代码精确匹配（区分大小写）
    pub fn get(&self, symbol: &str) -> Option<&QuoteRecord> {
        self.quotes.get(symbol)
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &QuoteRecord> {
        self.quotes.values()
    }

    /// 编码为持久化 blob
    pub fn to_blob(&self) -> Result<String, QuoteWatchError> {
        serde_json::to_string(self).map_err(|e| QuoteWatchError::Corrupt(e.to_string()))
    }

    /// 从持久化 blob 解码
    pub fn from_blob(blob: &str) -> Result<Self, QuoteWatchError> {
        serde_json::from_str(blob).map_err(|e| QuoteWatchError::Corrupt(e.to_string()))
    }
}

impl FromIterator<QuoteRecord> for Snapshot {
    fn from_iter<I: IntoIterator<Item = QuoteRecord>>(iter: I) -> Self {
        let mut snapshot = Snapshot::new();
        for record in iter {
            snapshot.insert(record);
        }
        snapshot
    }
}
