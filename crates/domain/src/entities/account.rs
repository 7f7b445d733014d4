//! 持仓所有者：顾问（Advisor）与经理（Manager）
//!
//! 两类所有者通过 [`HoldingOwner`] 统一遍历：
//! 顾问直接持有持仓，经理代多个客户持有，通知都发给所有者本人的联系邮箱

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::entities::Holding;
use crate::errors::QuoteWatchError;
use crate::traits::{AccountBookSource, Directory};

/// 持有持仓、并能解析出联系邮箱的账户
pub trait HoldingOwner {
    /// 用于目录查询的账户 ID
    fn contact_account(&self) -> &str;

    /// 该账户名下的全部持仓
    fn owned_holdings(&self) -> Vec<&Holding>;
}

/// 顾问，为自己或基金管理持仓
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advisor {
    pub account_id: String,
    #[serde(default)]
    pub holdings: Vec<Holding>,
}

impl HoldingOwner for Advisor {
    fn contact_account(&self) -> &str {
        &self.account_id
    }

    fn owned_holdings(&self) -> Vec<&Holding> {
        self.holdings.iter().collect()
    }
}

/// 经理名下的客户，客户本身不是目录账户
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub client_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub holdings: Vec<Holding>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manager {
    pub account_id: String,
    #[serde(default)]
    pub clients: Vec<Client>,
}

impl HoldingOwner for Manager {
    fn contact_account(&self) -> &str {
        &self.account_id
    }

    /// 按客户顺序展开
    fn owned_holdings(&self) -> Vec<&Holding> {
        self.clients.iter().flat_map(|c| c.holdings.iter()).collect()
    }
}

/// 账户簿：目录 + 两类所有者
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountBook {
    #[serde(default)]
    pub directory: HashMap<String, String>,
    #[serde(default)]
    pub advisors: Vec<Advisor>,
    #[serde(default)]
    pub managers: Vec<Manager>,
}

impl AccountBook {
    pub fn is_empty(&self) -> bool {
        self.advisors.is_empty() && self.managers.is_empty()
    }

    /// 全部所有者的持仓数量
    pub fn holding_count(&self) -> usize {
        let advisors: usize = self.advisors.iter().map(|a| a.holdings.len()).sum();
        let managers: usize = self.managers.iter().map(|m| m.owned_holdings().len()).sum();
        advisors + managers
    }
}

impl Directory for AccountBook {
    fn resolve(&self, account_id: &str) -> Result<String, QuoteWatchError> {
        self.directory.resolve(account_id)
    }
}

/// 固定内容的账户簿，用于测试和单次运行
#[async_trait]
impl AccountBookSource for AccountBook {
    async fn load(&self) -> Result<AccountBook, QuoteWatchError> {
        Ok(self.clone())
    }
}
