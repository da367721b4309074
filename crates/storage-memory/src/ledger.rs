//! In-memory ledger store.

use std::sync::RwLock;

use async_trait::async_trait;
use dripfolio_core::ledger::{EntryKind, LedgerEntry, LedgerRepositoryTrait};
use dripfolio_core::Result;

use crate::lock_poisoned;

/// Append-only ledger store. Catch-up months are written with backdated
/// timestamps, so reads sort by timestamp rather than insertion order.
#[derive(Default)]
pub struct MemoryLedgerRepository {
    entries: RwLock<Vec<LedgerEntry>>,
}

impl MemoryLedgerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn by_timestamp(mut entries: Vec<LedgerEntry>) -> Vec<LedgerEntry> {
    entries.sort_by_key(|e| e.timestamp);
    entries
}

#[async_trait]
impl LedgerRepositoryTrait for MemoryLedgerRepository {
    async fn append(&self, entry: LedgerEntry) -> Result<LedgerEntry> {
        let mut entries = self.entries.write().map_err(|_| lock_poisoned("ledger"))?;
        entries.push(entry.clone());
        Ok(entry)
    }

    fn get_entries(&self) -> Result<Vec<LedgerEntry>> {
        let entries = self.entries.read().map_err(|_| lock_poisoned("ledger"))?;
        Ok(by_timestamp(entries.clone()))
    }

    fn get_entries_of_kind(&self, kind: EntryKind) -> Result<Vec<LedgerEntry>> {
        let entries = self.entries.read().map_err(|_| lock_poisoned("ledger"))?;
        Ok(by_timestamp(
            entries.iter().filter(|e| e.kind == kind).cloned().collect(),
        ))
    }

    fn get_entries_for_symbol(&self, symbol: &str) -> Result<Vec<LedgerEntry>> {
        let entries = self.entries.read().map_err(|_| lock_poisoned("ledger"))?;
        Ok(by_timestamp(
            entries
                .iter()
                .filter(|e| e.symbol.as_deref() == Some(symbol))
                .cloned()
                .collect(),
        ))
    }
}
