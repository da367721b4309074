//! Order domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ledger::{EntryKind, TradingMode};

/// Side of a trade instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Ledger entry kind this side produces.
    pub fn entry_kind(&self) -> EntryKind {
        match self {
            OrderSide::Buy => EntryKind::Buy,
            OrderSide::Sell => EntryKind::Sell,
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "BUY"),
            OrderSide::Sell => write!(f, "SELL"),
        }
    }
}

/// A single trade instruction for the executor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub side: OrderSide,
    pub symbol: String,
    pub quantity: Decimal,
    pub mode: TradingMode,
    /// Explicit execution price. When absent, a live quote is fetched;
    /// catch-up rebalancing always supplies the resolved historical price.
    pub price: Option<Decimal>,
    pub notes: Option<String>,
    /// Bookkeeping timestamp; defaults to now. Catch-up rebalancing stamps
    /// the target month so replayed history reads correctly.
    pub executed_at: Option<DateTime<Utc>>,
}

impl OrderRequest {
    pub fn buy(symbol: &str, quantity: Decimal, mode: TradingMode) -> Self {
        Self {
            side: OrderSide::Buy,
            symbol: symbol.to_string(),
            quantity,
            mode,
            price: None,
            notes: None,
            executed_at: None,
        }
    }

    pub fn sell(symbol: &str, quantity: Decimal, mode: TradingMode) -> Self {
        Self {
            side: OrderSide::Sell,
            symbol: symbol.to_string(),
            quantity,
            mode,
            price: None,
            notes: None,
            executed_at: None,
        }
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }

    pub fn with_executed_at(mut self, at: DateTime<Utc>) -> Self {
        self.executed_at = Some(at);
        self
    }
}

/// Broker bridge response for a placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BrokerOrderResult {
    /// The order filled; the reported quantity and price are what gets
    /// recorded, fully replacing the requested values.
    #[serde(rename_all = "camelCase")]
    Filled {
        filled_quantity: Decimal,
        fill_price: Decimal,
    },
    Rejected {
        reason: String,
    },
}
