use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, info, warn};
use rust_decimal::Decimal;

use super::snapshot_model::{PortfolioSnapshot, PortfolioValuation, SnapshotKind};
use super::snapshot_traits::{SnapshotRepositoryTrait, SnapshotServiceTrait};
use crate::ledger::{LedgerEntry, LedgerServiceTrait};
use crate::positions::PositionServiceTrait;
use crate::pricing::PriceResolverTrait;
use crate::Result;

/// Values the portfolio and persists point-in-time snapshots.
pub struct SnapshotService {
    ledger: Arc<dyn LedgerServiceTrait>,
    positions: Arc<dyn PositionServiceTrait>,
    resolver: Arc<dyn PriceResolverTrait>,
    repository: Arc<dyn SnapshotRepositoryTrait>,
}

impl SnapshotService {
    pub fn new(
        ledger: Arc<dyn LedgerServiceTrait>,
        positions: Arc<dyn PositionServiceTrait>,
        resolver: Arc<dyn PriceResolverTrait>,
        repository: Arc<dyn SnapshotRepositoryTrait>,
    ) -> Self {
        Self {
            ledger,
            positions,
            resolver,
            repository,
        }
    }
}

#[async_trait]
impl SnapshotServiceTrait for SnapshotService {
    async fn value_portfolio(&self, as_of: NaiveDate) -> Result<PortfolioValuation> {
        let open_positions = self.positions.get_current_positions()?;
        let cash_balance = self.ledger.cash_balance()?;

        let pricing_futures: Vec<_> = open_positions
            .into_iter()
            .map(|position| async move {
                match self.resolver.resolve_price(&position.symbol, as_of).await {
                    Ok(resolved) => position.revalued(resolved.price),
                    Err(e) => {
                        warn!(
                            "No price for {} as of {}; valuing at last known price: {}",
                            position.symbol, as_of, e
                        );
                        position.revalued(position.last_known_price)
                    }
                }
            })
            .collect();

        let valued = futures::future::join_all(pricing_futures).await;

        let invested_amount: Decimal = valued.iter().map(|p| p.last_known_value).sum();
        let total_unrealized_pl: Decimal = valued.iter().map(|p| p.unrealized_pl).sum();

        Ok(PortfolioValuation {
            as_of,
            cash_balance,
            invested_amount,
            total_value: cash_balance + invested_amount,
            total_unrealized_pl,
            positions: valued,
            calculated_at: Utc::now(),
        })
    }

    async fn build_and_commit(
        &self,
        kind: SnapshotKind,
        as_of: NaiveDate,
        effective_at: DateTime<Utc>,
    ) -> Result<PortfolioSnapshot> {
        let valuation = self.value_portfolio(as_of).await?;
        let snapshot = PortfolioSnapshot::from_valuation(kind, &valuation, effective_at)?;
        let committed = self.repository.commit(snapshot).await?;
        debug!(
            "Committed {} snapshot effective {} (total value {})",
            committed.kind, committed.timestamp, committed.total_value
        );
        Ok(committed)
    }

    async fn commit_manual_snapshot(&self) -> Result<PortfolioSnapshot> {
        let now = Utc::now();
        self.build_and_commit(SnapshotKind::Manual, now.date_naive(), now)
            .await
    }

    async fn record_deposit(
        &self,
        amount: Decimal,
        notes: Option<String>,
    ) -> Result<(LedgerEntry, PortfolioSnapshot)> {
        let entry = self.ledger.record_deposit(amount, notes).await?;
        let now = Utc::now();
        let snapshot = self
            .build_and_commit(SnapshotKind::Deposit, now.date_naive(), now)
            .await?;
        info!(
            "Recorded deposit of {}; cash balance is now {}",
            amount, snapshot.cash_balance
        );
        Ok((entry, snapshot))
    }

    fn latest(&self, kind: Option<SnapshotKind>) -> Result<Option<PortfolioSnapshot>> {
        self.repository.get_latest(kind)
    }

    fn list(&self) -> Result<Vec<PortfolioSnapshot>> {
        self.repository.get_all()
    }
}
