use super::pricing_model::{HistoricalClose, ResolvedPrice};
use crate::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Read contract over the cached close store. Population of the cache is an
/// acquisition concern and lives outside the engine.
pub trait QuoteRepositoryTrait: Send + Sync {
    fn get_close(&self, symbol: &str, on: NaiveDate) -> Result<Option<HistoricalClose>>;

    /// Latest close with `start <= date <= end`.
    fn get_latest_close_in_range(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<HistoricalClose>>;

    fn get_latest_close(&self, symbol: &str) -> Result<Option<HistoricalClose>>;
}

/// External market data collaborator contract.
#[async_trait]
pub trait MarketDataProviderTrait: Send + Sync {
    async fn historical_close(&self, symbol: &str, date: NaiveDate) -> Result<Option<Decimal>>;
    async fn live_quote(&self, symbol: &str) -> Result<Option<Decimal>>;
    fn is_available(&self) -> bool;
}

/// Trait defining the contract for price resolution.
#[async_trait]
pub trait PriceResolverTrait: Send + Sync {
    /// Best-available price for `symbol` as of `target_date` under the
    /// fallback policy. Errs when every tier comes up empty.
    async fn resolve_price(&self, symbol: &str, target_date: NaiveDate) -> Result<ResolvedPrice>;
}
