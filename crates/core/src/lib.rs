//! Dripfolio Core - Domain entities, services, and traits.
//!
//! This crate contains the rebalancing and portfolio accounting engine.
//! It is storage-agnostic and defines traits that are implemented
//! by the `storage-memory` crate (or any other store).

pub mod cache;
pub mod constants;
pub mod errors;
pub mod ledger;
pub mod orders;
pub mod positions;
pub mod pricing;
pub mod rebalance;
pub mod scheduling;
pub mod settings;
pub mod snapshots;
pub mod utils;

// Re-export common types from the accounting and rebalance modules
pub use ledger::*;
pub use positions::*;
pub use rebalance::*;
pub use snapshots::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
