//! Snapshots module - point-in-time portfolio valuations. The latest
//! monthly-rebalance snapshot doubles as the catch-up idempotency marker.

mod snapshot_model;
mod snapshot_service;
mod snapshot_traits;


pub use snapshot_model::{PortfolioSnapshot, PortfolioValuation, SnapshotKind};
pub use snapshot_service::SnapshotService;
pub use snapshot_traits::{SnapshotRepositoryTrait, SnapshotServiceTrait};
