//! In-memory storage implementation for Dripfolio.
//!
//! Implements the repository traits defined in `dripfolio-core` with
//! `RwLock`-guarded collections. This is the store used by simulated
//! deployments and the test-suite; nothing here survives a process restart.
//!
//! # Architecture
//!
//! ```text
//!          core (domain)
//!                │
//!                ▼
//!    storage-memory (this crate)
//! ```
//!
//! All repositories are append-only where the domain demands it (ledger,
//! positions): there is no update or delete surface to misuse. Lock
//! poisoning converts to `StoreError::Internal`; a poisoned store is not
//! recoverable by retrying.

pub mod ledger;
pub mod positions;
pub mod quotes;
pub mod settings;
pub mod snapshots;

pub use ledger::MemoryLedgerRepository;
pub use positions::MemoryPositionRepository;
pub use quotes::MemoryQuoteRepository;
pub use settings::MemorySettingsRepository;
pub use snapshots::MemorySnapshotRepository;

// Re-export from dripfolio-core for convenience
pub use dripfolio_core::errors::{Error, Result};

use dripfolio_core::errors::StoreError;
use log::error;

pub(crate) fn lock_poisoned(store: &str) -> Error {
    error!("{} store lock poisoned; a writer panicked mid-update", store);
    StoreError::Internal(format!("{} store lock poisoned", store)).into()
}
