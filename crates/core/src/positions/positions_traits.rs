use super::positions_model::Position;
use crate::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Trait defining the contract for position repository operations.
///
/// Rows are append-only: one new row per mutation, no updates or deletes.
#[async_trait]
pub trait PositionRepositoryTrait: Send + Sync {
    async fn append(&self, position: Position) -> Result<Position>;

    /// Latest row for the symbol, open or closed.
    fn get_latest_for_symbol(&self, symbol: &str) -> Result<Option<Position>>;

    /// Latest row per symbol, restricted to open positions.
    fn get_current_positions(&self) -> Result<Vec<Position>>;

    /// Full mutation history for a symbol, oldest first.
    fn get_history_for_symbol(&self, symbol: &str) -> Result<Vec<Position>>;
}

/// Trait defining the contract for position service operations.
#[async_trait]
pub trait PositionServiceTrait: Send + Sync {
    /// Applies a buy, appending the resulting row.
    async fn apply_buy(
        &self,
        symbol: &str,
        quantity: Decimal,
        price: Decimal,
        at: DateTime<Utc>,
    ) -> Result<Position>;

    /// Applies a sell, appending the resulting row. Oversells clamp at zero
    /// with a warning.
    async fn apply_sell(
        &self,
        symbol: &str,
        quantity: Decimal,
        price: Decimal,
        at: DateTime<Utc>,
    ) -> Result<Position>;

    fn get_current_positions(&self) -> Result<Vec<Position>>;
    fn get_latest_for_symbol(&self, symbol: &str) -> Result<Option<Position>>;
}
