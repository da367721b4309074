//! Rebalance module - the catch-up state machine that turns missed months
//! into priced buy orders and committed snapshots.

mod rebalance_errors;
mod rebalance_model;
mod rebalance_service;
mod rebalance_traits;


pub use rebalance_errors::RebalanceError;
pub use rebalance_model::{
    AnalysisResult, EngineState, MonthRebalanceResult, RebalanceOutcome, RebalanceStatus,
    Recommendation, SymbolFailure,
};
pub use rebalance_service::RebalanceEngine;
pub use rebalance_traits::{AnalyzerTrait, RebalanceEngineTrait};
