//! In-memory historical close store.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use chrono::NaiveDate;
use dripfolio_core::pricing::{HistoricalClose, QuoteRepositoryTrait};
use dripfolio_core::Result;
use rust_decimal::Decimal;

use crate::lock_poisoned;

/// Per-symbol close series, keyed by date. Population is the caller's
/// concern; the engine only reads.
#[derive(Default)]
pub struct MemoryQuoteRepository {
    closes: RwLock<HashMap<String, BTreeMap<NaiveDate, Decimal>>>,
}

impl MemoryQuoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the close for `symbol` on `date`.
    pub fn insert_close(&self, symbol: &str, date: NaiveDate, close: Decimal) -> Result<()> {
        let mut closes = self.closes.write().map_err(|_| lock_poisoned("quote"))?;
        closes
            .entry(symbol.to_string())
            .or_default()
            .insert(date, close);
        Ok(())
    }

    fn make_close(symbol: &str, date: NaiveDate, close: Decimal) -> HistoricalClose {
        HistoricalClose {
            symbol: symbol.to_string(),
            date,
            close,
        }
    }
}

impl QuoteRepositoryTrait for MemoryQuoteRepository {
    fn get_close(&self, symbol: &str, on: NaiveDate) -> Result<Option<HistoricalClose>> {
        let closes = self.closes.read().map_err(|_| lock_poisoned("quote"))?;
        Ok(closes
            .get(symbol)
            .and_then(|series| series.get(&on))
            .map(|close| Self::make_close(symbol, on, *close)))
    }

    fn get_latest_close_in_range(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<HistoricalClose>> {
        let closes = self.closes.read().map_err(|_| lock_poisoned("quote"))?;
        Ok(closes.get(symbol).and_then(|series| {
            series
                .range(start..=end)
                .next_back()
                .map(|(date, close)| Self::make_close(symbol, *date, *close))
        }))
    }

    fn get_latest_close(&self, symbol: &str) -> Result<Option<HistoricalClose>> {
        let closes = self.closes.read().map_err(|_| lock_poisoned("quote"))?;
        Ok(closes.get(symbol).and_then(|series| {
            series
                .last_key_value()
                .map(|(date, close)| Self::make_close(symbol, *date, *close))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_exact_close_lookup() {
        let repo = MemoryQuoteRepository::new();
        repo.insert_close("KO", date(2024, 2, 1), dec!(60)).unwrap();

        let close = repo.get_close("KO", date(2024, 2, 1)).unwrap().unwrap();
        assert_eq!(close.close, dec!(60));
        assert!(repo.get_close("KO", date(2024, 2, 2)).unwrap().is_none());
        assert!(repo.get_close("PG", date(2024, 2, 1)).unwrap().is_none());
    }

    #[test]
    fn test_latest_in_range_picks_newest_inside_window() {
        let repo = MemoryQuoteRepository::new();
        repo.insert_close("KO", date(2024, 1, 29), dec!(58)).unwrap();
        repo.insert_close("KO", date(2024, 1, 31), dec!(59)).unwrap();
        repo.insert_close("KO", date(2024, 2, 5), dec!(61)).unwrap();

        let close = repo
            .get_latest_close_in_range("KO", date(2024, 1, 25), date(2024, 2, 1))
            .unwrap()
            .unwrap();
        assert_eq!(close.date, date(2024, 1, 31));
        assert_eq!(close.close, dec!(59));

        assert!(repo
            .get_latest_close_in_range("KO", date(2023, 12, 1), date(2023, 12, 31))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_latest_close_ignores_recency() {
        let repo = MemoryQuoteRepository::new();
        repo.insert_close("KO", date(2022, 6, 1), dec!(44)).unwrap();
        repo.insert_close("KO", date(2023, 6, 1), dec!(52)).unwrap();

        let close = repo.get_latest_close("KO").unwrap().unwrap();
        assert_eq!(close.date, date(2023, 6, 1));
    }
}
