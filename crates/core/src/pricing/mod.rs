//! Pricing module - historical price resolution with a defined fallback
//! policy.

mod pricing_errors;
mod pricing_model;
mod pricing_service;
mod pricing_traits;


pub use pricing_errors::PricingError;
pub use pricing_model::{HistoricalClose, PriceSource, ResolvedPrice};
pub use pricing_service::PriceResolver;
pub use pricing_traits::{MarketDataProviderTrait, PriceResolverTrait, QuoteRepositoryTrait};
