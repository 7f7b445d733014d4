//! 价格提醒评估引擎
//!
//! 给定最新快照和全部持仓，找出被最近一次价格变动“穿越”的提醒。
//! 纯计算，没有副作用

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use quote_watch_domain::{
    AccountBook, Advisor, Directory, Holding, HoldingOwner, Manager, QuoteRecord, Snapshot,
    TriggeredAlert,
};

/// 穿越判定
///
/// 目标价落在两根最新K线开盘价构成的闭区间内，或者恰好等于当前价，即触发。
/// 与价格变动方向无关
pub fn crosses(target: Decimal, old_open: Decimal, new_open: Decimal, current_price: Decimal) -> bool {
    let low = old_open.min(new_open);
    let high = old_open.max(new_open);
    (low <= target && target <= high) || current_price == target
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AlertEvaluator;

impl AlertEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// 评估账户簿中的全部持仓
    pub fn evaluate_book(&self, snapshot: &Snapshot, book: &AccountBook) -> Vec<TriggeredAlert> {
        self.evaluate(snapshot, &book.advisors, &book.managers, book)
    }

    /// 顾问和经理走同一套遍历，经理名下客户的提醒发给经理本人
    pub fn evaluate(
        &self,
        snapshot: &Snapshot,
        advisors: &[Advisor],
        managers: &[Manager],
        directory: &dyn Directory,
    ) -> Vec<TriggeredAlert> {
        let mut triggered = Vec::new();
        let owners = advisors
            .iter()
            .map(|a| a as &dyn HoldingOwner)
            .chain(managers.iter().map(|m| m as &dyn HoldingOwner));

        for owner in owners {
            self.evaluate_owner(snapshot, owner, directory, &mut triggered);
        }

        info!(
            "提醒评估完成: advisors={}, managers={}, 触发={}",
            advisors.len(),
            managers.len(),
            triggered.len()
        );
        triggered
    }

    fn evaluate_owner(
        &self,
        snapshot: &Snapshot,
        owner: &dyn HoldingOwner,
        directory: &dyn Directory,
        out: &mut Vec<TriggeredAlert>,
    ) {
        let email = match directory.resolve(owner.contact_account()) {
            Ok(email) => email,
            Err(e) => {
                warn!("跳过账户 {} 的全部持仓: {}", owner.contact_account(), e);
                return;
            }
        };

        for holding in owner.owned_holdings() {
            if !holding.has_alerts() {
                continue;
            }
            let Some(quote) = snapshot.get(&holding.instrument_symbol) else {
                debug!("快照中没有 {}，跳过", holding.instrument_symbol);
                continue;
            };
            self.evaluate_holding(quote, holding, &email, out);
        }
    }

    /// 同一持仓内按提醒原有顺序输出
    fn evaluate_holding(
        &self,
        quote: &QuoteRecord,
        holding: &Holding,
        email: &str,
        out: &mut Vec<TriggeredAlert>,
    ) {
        let Some((new_open, old_open)) = quote.latest_opens() else {
            warn!("{} 的历史K线不足两根，跳过", quote.symbol);
            return;
        };

        for alert in &holding.alerts {
            let target = match alert.target_price.to_decimal() {
                Ok(target) => target,
                Err(e) => {
                    warn!("{} 的提醒 {:?} 无效，跳过: {}", quote.symbol, alert.id, e);
                    continue;
                }
            };

            if crosses(target, old_open, new_open, quote.current_price) {
                info!(
                    "🔔 提醒触发: {} target={} open {}→{} current={} to={}",
                    quote.symbol, target, old_open, new_open, quote.current_price, email
                );
                out.push(TriggeredAlert {
                    recipient_email: email.to_string(),
                    symbol: quote.symbol.clone(),
                    instrument_name: quote.display_name.clone(),
                    triggered_price: target,
                });
            }
        }
    }
}
