//! Ledger module - append-only record of cash movements and trades.

mod ledger_errors;
mod ledger_model;
mod ledger_service;
mod ledger_traits;


pub use ledger_errors::LedgerError;
pub use ledger_model::{EntryKind, LedgerEntry, NewLedgerEntry, TradingMode};
pub use ledger_service::LedgerService;
pub use ledger_traits::{LedgerRepositoryTrait, LedgerServiceTrait};
