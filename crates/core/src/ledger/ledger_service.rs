use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use rust_decimal::Decimal;

use super::ledger_model::*;
use super::ledger_traits::{LedgerRepositoryTrait, LedgerServiceTrait};
use crate::Result;

/// Service in front of the append-only ledger store.
///
/// The cash balance is never kept as a counter; every read folds the entry
/// sequence, so it cannot drift from the ledger.
pub struct LedgerService {
    repository: Arc<dyn LedgerRepositoryTrait>,
}

impl LedgerService {
    pub fn new(repository: Arc<dyn LedgerRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl LedgerServiceTrait for LedgerService {
    async fn append(&self, draft: NewLedgerEntry) -> Result<LedgerEntry> {
        draft.validate()?;
        let entry = draft.into_entry();
        debug!(
            "Appending ledger entry: {} {} amount {}",
            entry.kind,
            entry.symbol.as_deref().unwrap_or("-"),
            entry.total_amount
        );
        self.repository.append(entry).await
    }

    async fn record_deposit(&self, amount: Decimal, notes: Option<String>) -> Result<LedgerEntry> {
        self.append(NewLedgerEntry::deposit(amount, notes)).await
    }

    fn cash_balance(&self) -> Result<Decimal> {
        let entries = self.repository.get_entries()?;
        Ok(entries.iter().map(LedgerEntry::cash_effect).sum())
    }

    fn get_entries(&self) -> Result<Vec<LedgerEntry>> {
        self.repository.get_entries()
    }

    fn get_entries_of_kind(&self, kind: EntryKind) -> Result<Vec<LedgerEntry>> {
        self.repository.get_entries_of_kind(kind)
    }

    fn get_entries_for_symbol(&self, symbol: &str) -> Result<Vec<LedgerEntry>> {
        self.repository.get_entries_for_symbol(symbol)
    }
}
