use super::ledger_model::*;
use crate::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Trait defining the contract for ledger repository operations.
///
/// Implementations store entries immutably: there is no update or delete
/// surface, by construction.
#[async_trait]
pub trait LedgerRepositoryTrait: Send + Sync {
    async fn append(&self, entry: LedgerEntry) -> Result<LedgerEntry>;
    /// All entries in timestamp order.
    fn get_entries(&self) -> Result<Vec<LedgerEntry>>;
    fn get_entries_of_kind(&self, kind: EntryKind) -> Result<Vec<LedgerEntry>>;
    fn get_entries_for_symbol(&self, symbol: &str) -> Result<Vec<LedgerEntry>>;
}

/// Trait defining the contract for ledger service operations.
#[async_trait]
pub trait LedgerServiceTrait: Send + Sync {
    /// Validates the draft and appends the resulting immutable entry.
    async fn append(&self, draft: NewLedgerEntry) -> Result<LedgerEntry>;

    /// Appends a DEPOSIT entry for `amount`.
    async fn record_deposit(&self, amount: Decimal, notes: Option<String>) -> Result<LedgerEntry>;

    /// Cash balance as a pure fold over all entries:
    /// deposits add, buys subtract, sells add, markers contribute nothing.
    fn cash_balance(&self) -> Result<Decimal>;

    fn get_entries(&self) -> Result<Vec<LedgerEntry>>;
    fn get_entries_of_kind(&self, kind: EntryKind) -> Result<Vec<LedgerEntry>>;
    fn get_entries_for_symbol(&self, symbol: &str) -> Result<Vec<LedgerEntry>>;
}
