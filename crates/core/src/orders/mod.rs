//! Orders module - turns trade instructions into ledger entries and position
//! updates, all-or-nothing per order.

mod orders_errors;
mod orders_model;
mod orders_service;
mod orders_traits;

#[cfg(test)]
mod orders_service_tests;

pub use orders_errors::OrderError;
pub use orders_model::{BrokerOrderResult, OrderRequest, OrderSide};
pub use orders_service::OrderExecutor;
pub use orders_traits::{BrokerBridgeTrait, OrderExecutorTrait};
