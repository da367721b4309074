use super::orders_model::{BrokerOrderResult, OrderRequest, OrderSide};
use crate::ledger::LedgerEntry;
use crate::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// External broker collaborator contract (LIVE mode only).
#[async_trait]
pub trait BrokerBridgeTrait: Send + Sync {
    async fn place_order(
        &self,
        side: OrderSide,
        symbol: &str,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<BrokerOrderResult>;
}

/// Trait defining the contract for order execution.
#[async_trait]
pub trait OrderExecutorTrait: Send + Sync {
    /// Executes one order: prices it, places it with the broker in LIVE
    /// mode, appends the ledger entry, and updates the position. The ledger
    /// and position writes are all-or-nothing; any failure leaves both
    /// untouched.
    async fn execute(&self, order: OrderRequest) -> Result<LedgerEntry>;
}
