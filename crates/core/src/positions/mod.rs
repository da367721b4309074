//! Positions module - per-symbol quantity and weighted-average cost tracking.

mod positions_model;
mod positions_service;
mod positions_traits;


pub use positions_model::{is_quantity_significant, Position};
pub use positions_service::{replay_ledger, PositionService};
pub use positions_traits::{PositionRepositoryTrait, PositionServiceTrait};
