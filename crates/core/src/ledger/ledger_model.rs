//! Ledger domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ledger_errors::LedgerError;
use crate::errors::ValidationError;

/// Classification of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryKind {
    Deposit,
    Buy,
    Sell,
    /// Zero-amount audit entry written after a committed rebalance month.
    RebalanceMarker,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntryKind::Deposit => "DEPOSIT",
            EntryKind::Buy => "BUY",
            EntryKind::Sell => "SELL",
            EntryKind::RebalanceMarker => "REBALANCE_MARKER",
        };
        write!(f, "{}", label)
    }
}

/// Execution mode stamped on every entry.
///
/// SIMULATED entries are bookkeeping only; LIVE entries correspond to orders
/// placed through the broker bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradingMode {
    #[default]
    Simulated,
    Live,
}

impl fmt::Display for TradingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradingMode::Simulated => write!(f, "SIMULATED"),
            TradingMode::Live => write!(f, "LIVE"),
        }
    }
}

impl FromStr for TradingMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SIMULATED" => Ok(TradingMode::Simulated),
            "LIVE" => Ok(TradingMode::Live),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown trading mode '{}'",
                other
            ))),
        }
    }
}

/// Immutable ledger row. Never updated or deleted after creation; cash
/// balance and all historical reporting are folds over the entry sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub kind: EntryKind,
    pub symbol: Option<String>,
    pub quantity: Option<Decimal>,
    pub price: Option<Decimal>,
    pub total_amount: Decimal,
    pub mode: TradingMode,
    pub notes: Option<String>,
}

impl LedgerEntry {
    /// Signed contribution of this entry to the cash balance fold.
    pub fn cash_effect(&self) -> Decimal {
        match self.kind {
            EntryKind::Deposit => self.total_amount,
            EntryKind::Buy => -self.total_amount,
            EntryKind::Sell => self.total_amount,
            EntryKind::RebalanceMarker => Decimal::ZERO,
        }
    }
}

/// Input model for appending a new ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLedgerEntry {
    pub kind: EntryKind,
    pub symbol: Option<String>,
    pub quantity: Option<Decimal>,
    pub price: Option<Decimal>,
    pub total_amount: Decimal,
    pub mode: TradingMode,
    pub notes: Option<String>,
    /// Entry timestamp; defaults to now when absent.
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewLedgerEntry {
    pub fn deposit(amount: Decimal, notes: Option<String>) -> Self {
        Self {
            kind: EntryKind::Deposit,
            symbol: None,
            quantity: None,
            price: None,
            total_amount: amount,
            mode: TradingMode::Simulated,
            notes,
            timestamp: None,
        }
    }

    pub fn trade(
        kind: EntryKind,
        symbol: String,
        quantity: Decimal,
        price: Decimal,
        total_amount: Decimal,
        mode: TradingMode,
        notes: Option<String>,
    ) -> Self {
        Self {
            kind,
            symbol: Some(symbol),
            quantity: Some(quantity),
            price: Some(price),
            total_amount,
            mode,
            notes,
            timestamp: None,
        }
    }

    pub fn rebalance_marker(notes: Option<String>) -> Self {
        Self {
            kind: EntryKind::RebalanceMarker,
            symbol: None,
            quantity: None,
            price: None,
            total_amount: Decimal::ZERO,
            mode: TradingMode::Simulated,
            notes,
            timestamp: None,
        }
    }

    /// Validates shape only: kind-specific field presence and sign checks.
    /// Business rules (cash sufficiency, position existence) live upstream.
    pub fn validate(&self) -> std::result::Result<(), LedgerError> {
        if self.total_amount < Decimal::ZERO {
            return Err(LedgerError::InvalidEntry(
                "Total amount cannot be negative".to_string(),
            ));
        }

        match self.kind {
            EntryKind::Deposit => {
                if self.total_amount <= Decimal::ZERO {
                    return Err(LedgerError::InvalidEntry(
                        "Deposit amount must be positive".to_string(),
                    ));
                }
                if self.symbol.is_some() {
                    return Err(LedgerError::InvalidEntry(
                        "Deposit entries cannot reference a symbol".to_string(),
                    ));
                }
            }
            EntryKind::Buy | EntryKind::Sell => {
                let symbol_ok = self
                    .symbol
                    .as_deref()
                    .map(|s| !s.trim().is_empty())
                    .unwrap_or(false);
                if !symbol_ok {
                    return Err(LedgerError::InvalidEntry(format!(
                        "{} entries require a symbol",
                        self.kind
                    )));
                }
                if self.quantity.unwrap_or(Decimal::ZERO) <= Decimal::ZERO {
                    return Err(LedgerError::InvalidEntry(format!(
                        "{} entries require a positive quantity",
                        self.kind
                    )));
                }
                if self.price.unwrap_or(Decimal::ZERO) <= Decimal::ZERO {
                    return Err(LedgerError::InvalidEntry(format!(
                        "{} entries require a positive price",
                        self.kind
                    )));
                }
            }
            EntryKind::RebalanceMarker => {
                if self.total_amount != Decimal::ZERO {
                    return Err(LedgerError::InvalidEntry(
                        "Rebalance marker entries carry no amount".to_string(),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Assigns identity and a timestamp, producing the immutable row.
    pub fn into_entry(self) -> LedgerEntry {
        LedgerEntry {
            id: Uuid::new_v4().to_string(),
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            kind: self.kind,
            symbol: self.symbol,
            quantity: self.quantity,
            price: self.price,
            total_amount: self.total_amount,
            mode: self.mode,
            notes: self.notes,
        }
    }
}
