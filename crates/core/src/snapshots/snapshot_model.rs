//! Portfolio snapshot domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::positions::Position;
use crate::Result;

/// What triggered a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SnapshotKind {
    /// User-requested point-in-time valuation.
    Manual,
    /// Written after a cash deposit.
    Deposit,
    /// Written after a committed rebalance month. The latest snapshot of
    /// this kind marks the last month the engine finished.
    MonthlyRebalance,
}

impl fmt::Display for SnapshotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SnapshotKind::Manual => "MANUAL",
            SnapshotKind::Deposit => "DEPOSIT",
            SnapshotKind::MonthlyRebalance => "MONTHLY_REBALANCE",
        };
        write!(f, "{}", label)
    }
}

/// Valued view of the portfolio as of a pricing date. This is the read-path
/// result; committing one produces a [`PortfolioSnapshot`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioValuation {
    pub as_of: NaiveDate,
    pub cash_balance: Decimal,
    /// Market value of all open positions.
    pub invested_amount: Decimal,
    /// Cash plus invested.
    pub total_value: Decimal,
    pub total_unrealized_pl: Decimal,
    pub positions: Vec<Position>,
    pub calculated_at: DateTime<Utc>,
}

/// Persisted portfolio snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    pub id: String,
    /// Effective time of the snapshot. Monthly rebalance snapshots carry the
    /// target month here rather than the wall clock, so that the latest one
    /// always names the last committed month.
    pub timestamp: DateTime<Utc>,
    pub kind: SnapshotKind,
    pub cash_balance: Decimal,
    pub invested_amount: Decimal,
    pub total_value: Decimal,
    pub total_unrealized_pl: Decimal,
    /// Positions at snapshot time, stored as JSON.
    pub serialized_positions: String,
    /// When this snapshot was generated.
    pub calculated_at: DateTime<Utc>,
}

impl PortfolioSnapshot {
    /// Builds a snapshot from a valuation, stamping `effective_at`.
    pub fn from_valuation(
        kind: SnapshotKind,
        valuation: &PortfolioValuation,
        effective_at: DateTime<Utc>,
    ) -> Result<Self> {
        Ok(PortfolioSnapshot {
            id: Uuid::new_v4().to_string(),
            timestamp: effective_at,
            kind,
            cash_balance: valuation.cash_balance,
            invested_amount: valuation.invested_amount,
            total_value: valuation.total_value,
            total_unrealized_pl: valuation.total_unrealized_pl,
            serialized_positions: serde_json::to_string(&valuation.positions)?,
            calculated_at: valuation.calculated_at,
        })
    }

    /// Positions held at snapshot time.
    pub fn positions(&self) -> Result<Vec<Position>> {
        Ok(serde_json::from_str(&self.serialized_positions)?)
    }
}
