use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use super::rebalance_model::{AnalysisResult, EngineState, RebalanceOutcome};
use crate::Result;

/// External stock-scoring collaborator contract.
#[async_trait]
pub trait AnalyzerTrait: Send + Sync {
    async fn analyze(&self, symbol: &str) -> Result<AnalysisResult>;
}

/// Trait defining the contract for the rebalance engine.
#[async_trait]
pub trait RebalanceEngineTrait: Send + Sync {
    /// Runs one rebalance pass as of the current date.
    async fn run(&self) -> Result<RebalanceOutcome> {
        self.run_as_of(Utc::now().date_naive()).await
    }

    /// Runs one rebalance pass treating `today` as the current date. Errs
    /// with `RebalanceError::AlreadyInProgress` when a pass is running;
    /// every other failure is reported inside the returned outcome.
    async fn run_as_of(&self, today: NaiveDate) -> Result<RebalanceOutcome>;

    /// Observable engine phase.
    fn current_state(&self) -> EngineState;

    /// Asks a running pass to stop after the month in progress. No-op when
    /// idle.
    fn request_cancel(&self);
}
