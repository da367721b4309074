use rust_decimal::Decimal;
use thiserror::Error;

/// Order execution error types.
#[derive(Error, Debug)]
pub enum OrderError {
    #[error("Insufficient cash: order needs {required} but only {available} is available")]
    InsufficientCash {
        required: Decimal,
        available: Decimal,
    },

    #[error("Broker rejected the order: {0}")]
    BrokerRejected(String),

    #[error("Broker timed out placing order for {0}")]
    BrokerTimeout(String),

    /// No explicit price was supplied and no live quote could be fetched.
    #[error("Cannot price order for {0}")]
    Unpriced(String),
}
