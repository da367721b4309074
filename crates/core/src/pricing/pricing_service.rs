use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use tokio::time::timeout;

use super::pricing_errors::PricingError;
use super::pricing_model::{PriceSource, ResolvedPrice};
use super::pricing_traits::{MarketDataProviderTrait, PriceResolverTrait, QuoteRepositoryTrait};
use crate::constants::EXTERNAL_CALL_TIMEOUT_SECS;
use crate::Result;

const PRICE_LOOKBACK_DAYS: i64 = 7;

/// Resolves the best-available price for a symbol and target date.
///
/// Catch-up rebalancing prices trades as if executed on the missed month's
/// date, so cached closes near that date always win over anything current;
/// the live quote is the last resort before giving up.
pub struct PriceResolver {
    quote_repository: Arc<dyn QuoteRepositoryTrait>,
    provider: Arc<dyn MarketDataProviderTrait>,
}

impl PriceResolver {
    pub fn new(
        quote_repository: Arc<dyn QuoteRepositoryTrait>,
        provider: Arc<dyn MarketDataProviderTrait>,
    ) -> Self {
        Self {
            quote_repository,
            provider,
        }
    }

    async fn live_quote_with_timeout(&self, symbol: &str) -> Result<Option<Decimal>> {
        let deadline = Duration::from_secs(EXTERNAL_CALL_TIMEOUT_SECS);
        match timeout(deadline, self.provider.live_quote(symbol)).await {
            Ok(result) => result,
            Err(_) => Err(PricingError::ProviderTimeout(symbol.to_string()).into()),
        }
    }
}

#[async_trait]
impl PriceResolverTrait for PriceResolver {
    async fn resolve_price(&self, symbol: &str, target_date: NaiveDate) -> Result<ResolvedPrice> {
        // Tier 1: exact cached close. A non-positive close is treated as
        // absent; the lookback scan below re-encounters and reports it.
        if let Some(close) = self.quote_repository.get_close(symbol, target_date)? {
            if close.close > Decimal::ZERO {
                debug!("Resolved {} on {} from exact close", symbol, target_date);
                return Ok(ResolvedPrice {
                    symbol: symbol.to_string(),
                    price: close.close,
                    source: PriceSource::ExactClose,
                });
            }
        }

        // Tier 2: nearest positive close within the lookback window. Each
        // non-positive row shrinks the window so older valid closes are
        // still found.
        let lookback_start = target_date - chrono::Duration::days(PRICE_LOOKBACK_DAYS);
        let mut window_end = target_date;
        while let Some(close) =
            self.quote_repository
                .get_latest_close_in_range(symbol, lookback_start, window_end)?
        {
            if close.close > Decimal::ZERO {
                let days_back = (target_date - close.date).num_days();
                debug!(
                    "Resolved {} on {} from close {} day(s) back",
                    symbol, target_date, days_back
                );
                return Ok(ResolvedPrice {
                    symbol: symbol.to_string(),
                    price: close.close,
                    source: PriceSource::LookbackClose { days_back },
                });
            }
            warn!(
                "Ignoring non-positive cached close for {} on {}",
                symbol, close.date
            );
            match close.date.pred_opt() {
                Some(previous) if previous >= lookback_start => window_end = previous,
                _ => break,
            }
        }

        // Tier 3: most recent positive close, however old.
        let mut latest = self.quote_repository.get_latest_close(symbol)?;
        while let Some(close) = latest {
            if close.close > Decimal::ZERO {
                warn!(
                    "Resolved {} on {} from stale close dated {}",
                    symbol, target_date, close.date
                );
                return Ok(ResolvedPrice {
                    symbol: symbol.to_string(),
                    price: close.close,
                    source: PriceSource::StaleClose { as_of: close.date },
                });
            }
            warn!(
                "Ignoring non-positive cached close for {} on {}",
                symbol, close.date
            );
            latest = match close.date.pred_opt() {
                Some(previous) => self.quote_repository.get_latest_close_in_range(
                    symbol,
                    NaiveDate::MIN,
                    previous,
                )?,
                None => None,
            };
        }

        // Tier 4: live quote.
        if self.provider.is_available() {
            match self.live_quote_with_timeout(symbol).await {
                Ok(Some(price)) if price > Decimal::ZERO => {
                    info!(
                        "Resolved {} on {} from live quote (no usable cached close)",
                        symbol, target_date
                    );
                    return Ok(ResolvedPrice {
                        symbol: symbol.to_string(),
                        price,
                        source: PriceSource::LiveQuote,
                    });
                }
                Ok(_) => {
                    debug!("Live quote for {} returned no usable price", symbol);
                }
                Err(e) => {
                    warn!("Live quote for {} failed: {}", symbol, e);
                }
            }
        } else {
            debug!(
                "Market data provider unavailable; skipping live quote for {}",
                symbol
            );
        }

        Err(PricingError::NoPriceAvailable(symbol.to_string()).into())
    }
}
