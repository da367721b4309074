use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A cached daily closing price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalClose {
    pub symbol: String,
    pub date: NaiveDate,
    pub close: Decimal,
}

/// Which resolution tier produced a price.
///
/// Callers that care about historical fidelity can branch on this; a
/// `StaleClose` or `LiveQuote` for a months-old target date means the cache
/// had nothing near that date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tier", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceSource {
    /// Cached close for exactly the target date.
    ExactClose,
    /// Cached close within the lookback window before the target date.
    LookbackClose { days_back: i64 },
    /// Most recent cached close regardless of recency.
    StaleClose { as_of: NaiveDate },
    /// Live quote from the market data provider.
    LiveQuote,
}

impl PriceSource {
    pub fn is_stale(&self) -> bool {
        matches!(self, PriceSource::StaleClose { .. })
    }
}

impl fmt::Display for PriceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceSource::ExactClose => write!(f, "exact close"),
            PriceSource::LookbackClose { days_back } => {
                write!(f, "close {} day(s) back", days_back)
            }
            PriceSource::StaleClose { as_of } => write!(f, "stale close from {}", as_of),
            PriceSource::LiveQuote => write!(f, "live quote"),
        }
    }
}

/// A successfully resolved price and the tier it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPrice {
    pub symbol: String,
    pub price: Decimal,
    pub source: PriceSource,
}
