//! Rebalance domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::time_utils::TargetMonth;

/// Observable phase of the rebalance engine. The engine holds this as an
/// atomic token; the compare-and-swap from `Idle` is the single-flight guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngineState {
    #[default]
    Idle,
    CheckingIdempotency,
    CatchingUp,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EngineState::Idle => "IDLE",
            EngineState::CheckingIdempotency => "CHECKING_IDEMPOTENCY",
            EngineState::CatchingUp => "CATCHING_UP",
        };
        write!(f, "{}", label)
    }
}

/// Analyzer verdict for a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    Buy,
    Hold,
    Sell,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Recommendation::Buy => "BUY",
            Recommendation::Hold => "HOLD",
            Recommendation::Sell => "SELL",
        };
        write!(f, "{}", label)
    }
}

/// Analyzer output for one symbol. Only BUY recommendations make a symbol a
/// purchase candidate; the score ranks candidates within a cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub recommendation: Recommendation,
    pub score: f64,
}

/// How a rebalance pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RebalanceStatus {
    /// The current month was already committed; nothing to do.
    Skipped,
    /// Every missed month committed.
    Completed,
    /// A systemic failure aborted the pass; committed months stand.
    Failed,
}

impl fmt::Display for RebalanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RebalanceStatus::Skipped => "SKIPPED",
            RebalanceStatus::Completed => "COMPLETED",
            RebalanceStatus::Failed => "FAILED",
        };
        write!(f, "{}", label)
    }
}

/// One symbol that could not be purchased in a month. Recorded and skipped;
/// never aborts the month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SymbolFailure {
    pub symbol: String,
    pub message: String,
}

/// What happened in one caught-up month.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthRebalanceResult {
    pub target_month: TargetMonth,
    pub candidate_symbols: Vec<String>,
    pub purchased_count: usize,
    pub total_invested: Decimal,
    pub symbol_errors: Vec<SymbolFailure>,
}

impl MonthRebalanceResult {
    pub fn new(target_month: TargetMonth, candidate_symbols: Vec<String>) -> Self {
        Self {
            target_month,
            candidate_symbols,
            purchased_count: 0,
            total_invested: Decimal::ZERO,
            symbol_errors: Vec::new(),
        }
    }
}

/// Result of one rebalance pass. Transient: nothing here is persisted beyond
/// the snapshots and ledger entries the pass produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalanceOutcome {
    pub status: RebalanceStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub months_caught: usize,
    pub per_month_results: Vec<MonthRebalanceResult>,
    pub error_message: Option<String>,
}

impl RebalanceOutcome {
    pub fn skipped(started_at: DateTime<Utc>) -> Self {
        Self {
            status: RebalanceStatus::Skipped,
            started_at,
            finished_at: Utc::now(),
            months_caught: 0,
            per_month_results: Vec::new(),
            error_message: None,
        }
    }

    pub fn completed(started_at: DateTime<Utc>, per_month_results: Vec<MonthRebalanceResult>) -> Self {
        Self {
            status: RebalanceStatus::Completed,
            started_at,
            finished_at: Utc::now(),
            months_caught: per_month_results.len(),
            per_month_results,
            error_message: None,
        }
    }

    pub fn failed(
        started_at: DateTime<Utc>,
        per_month_results: Vec<MonthRebalanceResult>,
        error_message: String,
    ) -> Self {
        Self {
            status: RebalanceStatus::Failed,
            started_at,
            finished_at: Utc::now(),
            months_caught: per_month_results.len(),
            per_month_results,
            error_message: Some(error_message),
        }
    }

    /// True unless the pass aborted; a skip counts as success.
    pub fn succeeded(&self) -> bool {
        self.status != RebalanceStatus::Failed
    }

    /// Symbol failures across all caught months.
    pub fn symbol_error_count(&self) -> usize {
        self.per_month_results
            .iter()
            .map(|m| m.symbol_errors.len())
            .sum()
    }
}
