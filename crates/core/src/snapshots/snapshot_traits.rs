//! Repository traits for portfolio snapshots.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use super::{PortfolioSnapshot, PortfolioValuation, SnapshotKind};
use crate::errors::Result;
use crate::ledger::LedgerEntry;

/// Repository trait for managing portfolio snapshots.
#[async_trait]
pub trait SnapshotRepositoryTrait: Send + Sync {
    /// Persist a snapshot.
    async fn commit(&self, snapshot: PortfolioSnapshot) -> Result<PortfolioSnapshot>;

    /// Latest snapshot by effective timestamp, optionally restricted to one
    /// kind.
    fn get_latest(&self, kind: Option<SnapshotKind>) -> Result<Option<PortfolioSnapshot>>;

    /// All snapshots in effective-timestamp order.
    fn get_all(&self) -> Result<Vec<PortfolioSnapshot>>;
}

/// Trait defining the contract for snapshot operations.
#[async_trait]
pub trait SnapshotServiceTrait: Send + Sync {
    /// Values current holdings as of `as_of`. Positions whose price cannot
    /// be resolved are valued at their last known price; valuation never
    /// fails on a single symbol.
    async fn value_portfolio(&self, as_of: NaiveDate) -> Result<PortfolioValuation>;

    /// Values the portfolio as of `as_of` and commits a snapshot stamped
    /// `effective_at`.
    async fn build_and_commit(
        &self,
        kind: SnapshotKind,
        as_of: NaiveDate,
        effective_at: DateTime<Utc>,
    ) -> Result<PortfolioSnapshot>;

    /// Commits a MANUAL snapshot of the portfolio as of today.
    async fn commit_manual_snapshot(&self) -> Result<PortfolioSnapshot>;

    /// Records a cash deposit in the ledger, then commits a DEPOSIT
    /// snapshot reflecting the new balance.
    async fn record_deposit(
        &self,
        amount: Decimal,
        notes: Option<String>,
    ) -> Result<(LedgerEntry, PortfolioSnapshot)>;

    fn latest(&self, kind: Option<SnapshotKind>) -> Result<Option<PortfolioSnapshot>>;

    fn list(&self) -> Result<Vec<PortfolioSnapshot>>;
}
