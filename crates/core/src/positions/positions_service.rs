use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use rust_decimal::Decimal;

use super::positions_model::Position;
use super::positions_traits::{PositionRepositoryTrait, PositionServiceTrait};
use crate::errors::ValidationError;
use crate::ledger::{EntryKind, LedgerEntry};
use crate::Result;

/// Service in front of the append-only position store.
pub struct PositionService {
    repository: Arc<dyn PositionRepositoryTrait>,
}

impl PositionService {
    pub fn new(repository: Arc<dyn PositionRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn validate_trade_inputs(quantity: Decimal, price: Decimal) -> Result<()> {
        if quantity <= Decimal::ZERO {
            return Err(
                ValidationError::InvalidInput("Trade quantity must be positive".to_string()).into(),
            );
        }
        if price <= Decimal::ZERO {
            return Err(
                ValidationError::InvalidInput("Trade price must be positive".to_string()).into(),
            );
        }
        Ok(())
    }
}

#[async_trait]
impl PositionServiceTrait for PositionService {
    async fn apply_buy(
        &self,
        symbol: &str,
        quantity: Decimal,
        price: Decimal,
        at: DateTime<Utc>,
    ) -> Result<Position> {
        Self::validate_trade_inputs(quantity, price)?;

        let next = match self.repository.get_latest_for_symbol(symbol)? {
            Some(prior) => prior.after_buy(quantity, price, at),
            None => Position::opened(symbol, quantity, price, at),
        };
        debug!(
            "Position {} after buy: qty {} avg cost {}",
            symbol, next.quantity, next.average_cost
        );
        self.repository.append(next).await
    }

    async fn apply_sell(
        &self,
        symbol: &str,
        quantity: Decimal,
        price: Decimal,
        at: DateTime<Utc>,
    ) -> Result<Position> {
        Self::validate_trade_inputs(quantity, price)?;

        let next = match self.repository.get_latest_for_symbol(symbol)? {
            Some(prior) => prior.after_sell(quantity, price, at),
            None => {
                warn!(
                    "Sell of {} with no prior position; recording a closed row",
                    symbol
                );
                let mut closed = Position::opened(symbol, quantity, price, at);
                closed.quantity = Decimal::ZERO;
                closed.average_cost = Decimal::ZERO;
                closed.revalued(price)
            }
        };
        debug!(
            "Position {} after sell: qty {} avg cost {}",
            symbol, next.quantity, next.average_cost
        );
        self.repository.append(next).await
    }

    fn get_current_positions(&self) -> Result<Vec<Position>> {
        self.repository.get_current_positions()
    }

    fn get_latest_for_symbol(&self, symbol: &str) -> Result<Option<Position>> {
        self.repository.get_latest_for_symbol(symbol)
    }
}

/// Rebuilds the latest position row per symbol by replaying BUY and SELL
/// ledger entries in sequence. Used to reconstruct position state from the
/// ledger after a crash between an entry append and its position write.
///
/// Returns one row per traded symbol, closed positions included, sorted by
/// symbol.
pub fn replay_ledger(entries: &[LedgerEntry]) -> Vec<Position> {
    let mut positions: HashMap<String, Position> = HashMap::new();

    for entry in entries {
        let (symbol, quantity, price) = match (&entry.symbol, entry.quantity, entry.price) {
            (Some(symbol), Some(quantity), Some(price)) => (symbol, quantity, price),
            _ => continue,
        };

        match entry.kind {
            EntryKind::Buy => {
                let next = match positions.get(symbol) {
                    Some(prior) => prior.after_buy(quantity, price, entry.timestamp),
                    None => Position::opened(symbol, quantity, price, entry.timestamp),
                };
                positions.insert(symbol.clone(), next);
            }
            EntryKind::Sell => {
                if let Some(prior) = positions.get(symbol) {
                    let next = prior.after_sell(quantity, price, entry.timestamp);
                    positions.insert(symbol.clone(), next);
                } else {
                    warn!("Replay found sell of {} before any buy; skipping", symbol);
                }
            }
            EntryKind::Deposit | EntryKind::RebalanceMarker => {}
        }
    }

    let mut rows: Vec<Position> = positions.into_values().collect();
    rows.sort_by(|a, b| a.symbol.cmp(&b.symbol));
    rows
}
