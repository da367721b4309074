use thiserror::Error;

/// Pricing-related error types.
#[derive(Error, Debug)]
pub enum PricingError {
    /// Every resolution tier came up empty; the symbol cannot be priced now
    /// and must be skipped, never purchased at a zero price.
    #[error("No price available for {0}")]
    NoPriceAvailable(String),

    #[error("Market data provider timed out resolving {0}")]
    ProviderTimeout(String),
}
