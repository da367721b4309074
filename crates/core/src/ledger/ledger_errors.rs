use thiserror::Error;

/// Ledger-related error types.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid ledger entry: {0}")]
    InvalidEntry(String),
}
