use rust_decimal::Decimal;
use thiserror::Error;

/// Errors specific to rebalance passes.
#[derive(Debug, Error)]
pub enum RebalanceError {
    /// Single-flight guard: a second invocation while a pass runs no-ops
    /// with this error instead of blocking.
    #[error("A rebalance pass is already in progress")]
    AlreadyInProgress,

    #[error("Monthly investment amount is not configured")]
    MonthlyInvestmentNotConfigured,

    /// Systemic analyzer failure for a whole month; aborts remaining months.
    #[error("Analyzer unavailable: {0}")]
    AnalyzerUnavailable(String),

    #[error("Rebalance pass cancelled")]
    Cancelled,

    #[error("Allocation of {amount} buys no significant quantity of {symbol} at {price}")]
    AllocationTooSmall {
        symbol: String,
        amount: Decimal,
        price: Decimal,
    },
}
