use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tokio::time::timeout;

use super::orders_errors::OrderError;
use super::orders_model::{BrokerOrderResult, OrderRequest, OrderSide};
use super::orders_traits::{BrokerBridgeTrait, OrderExecutorTrait};
use crate::constants::{AMOUNT_DECIMAL_PRECISION, EXTERNAL_CALL_TIMEOUT_SECS};
use crate::errors::ValidationError;
use crate::ledger::{LedgerEntry, LedgerServiceTrait, NewLedgerEntry, TradingMode};
use crate::positions::PositionServiceTrait;
use crate::pricing::MarketDataProviderTrait;
use crate::Result;

/// Turns trade instructions into ledger entries and position updates.
///
/// The cash check, ledger append, and position update run under one
/// execution lock, so concurrent callers cannot double-spend the ledger or
/// lose an average-cost update. A buy is screened against available cash
/// before it reaches the broker, and a confirmed fill is always recorded.
/// The lock is only ever held for the bounded duration of the broker
/// timeout plus two store writes.
pub struct OrderExecutor {
    ledger: Arc<dyn LedgerServiceTrait>,
    positions: Arc<dyn PositionServiceTrait>,
    provider: Arc<dyn MarketDataProviderTrait>,
    broker: Arc<dyn BrokerBridgeTrait>,
    execution_lock: Mutex<()>,
}

impl OrderExecutor {
    pub fn new(
        ledger: Arc<dyn LedgerServiceTrait>,
        positions: Arc<dyn PositionServiceTrait>,
        provider: Arc<dyn MarketDataProviderTrait>,
        broker: Arc<dyn BrokerBridgeTrait>,
    ) -> Self {
        Self {
            ledger,
            positions,
            provider,
            broker,
            execution_lock: Mutex::new(()),
        }
    }

    /// Execution price: explicit when supplied, otherwise a live quote.
    async fn determine_price(&self, order: &OrderRequest) -> Result<Decimal> {
        if let Some(price) = order.price {
            if price <= Decimal::ZERO {
                return Err(ValidationError::InvalidInput(
                    "Order price must be positive".to_string(),
                )
                .into());
            }
            return Ok(price);
        }

        if !self.provider.is_available() {
            return Err(OrderError::Unpriced(order.symbol.clone()).into());
        }

        let deadline = Duration::from_secs(EXTERNAL_CALL_TIMEOUT_SECS);
        let quote = timeout(deadline, self.provider.live_quote(&order.symbol))
            .await
            .map_err(|_| OrderError::Unpriced(order.symbol.clone()))??;

        match quote {
            Some(price) if price > Decimal::ZERO => Ok(price),
            _ => Err(OrderError::Unpriced(order.symbol.clone()).into()),
        }
    }

    async fn place_with_broker(
        &self,
        order: &OrderRequest,
        price: Decimal,
    ) -> Result<(Decimal, Decimal)> {
        let deadline = Duration::from_secs(EXTERNAL_CALL_TIMEOUT_SECS);
        let placed = timeout(
            deadline,
            self.broker
                .place_order(order.side, &order.symbol, order.quantity, price),
        )
        .await
        .map_err(|_| OrderError::BrokerTimeout(order.symbol.clone()))??;

        match placed {
            BrokerOrderResult::Filled {
                filled_quantity,
                fill_price,
            } => {
                debug!(
                    "Broker filled {} {} x{} at {}",
                    order.side, order.symbol, filled_quantity, fill_price
                );
                Ok((filled_quantity, fill_price))
            }
            BrokerOrderResult::Rejected { reason } => {
                Err(OrderError::BrokerRejected(reason).into())
            }
        }
    }
}

#[async_trait]
impl OrderExecutorTrait for OrderExecutor {
    async fn execute(&self, order: OrderRequest) -> Result<LedgerEntry> {
        if order.quantity <= Decimal::ZERO {
            return Err(ValidationError::InvalidInput(
                "Order quantity must be positive".to_string(),
            )
            .into());
        }

        let price = self.determine_price(&order).await?;

        // Everything that reads or writes ledger/position state happens
        // under the lock, including the LIVE placement: the cash check runs
        // against a settled ledger and always precedes the broker call.
        let _guard = self.execution_lock.lock().await;

        if order.side == OrderSide::Buy {
            let required = (order.quantity * price).round_dp(AMOUNT_DECIMAL_PRECISION);
            let available = self.ledger.cash_balance()?;
            if required > available {
                return Err(OrderError::InsufficientCash {
                    required,
                    available,
                }
                .into());
            }
        }

        let (quantity, price) = match order.mode {
            TradingMode::Live => self.place_with_broker(&order, price).await?,
            TradingMode::Simulated => (order.quantity, price),
        };

        let total_amount = (quantity * price).round_dp(AMOUNT_DECIMAL_PRECISION);

        if order.mode == TradingMode::Live && order.side == OrderSide::Buy {
            let available = self.ledger.cash_balance()?;
            if total_amount > available {
                warn!(
                    "Live {} fill totals {} against {} available cash; recording the fill as reported",
                    order.symbol, total_amount, available
                );
            }
        }

        let executed_at = order.executed_at.unwrap_or_else(Utc::now);
        let mut draft = NewLedgerEntry::trade(
            order.side.entry_kind(),
            order.symbol.clone(),
            quantity,
            price,
            total_amount,
            order.mode,
            order.notes.clone(),
        );
        draft.timestamp = Some(executed_at);

        let entry = self.ledger.append(draft).await?;

        match order.side {
            OrderSide::Buy => {
                self.positions
                    .apply_buy(&order.symbol, quantity, price, executed_at)
                    .await?;
            }
            OrderSide::Sell => {
                self.positions
                    .apply_sell(&order.symbol, quantity, price, executed_at)
                    .await?;
            }
        }

        info!(
            "Executed {} {} x{} at {} ({}), total {}",
            order.side, order.symbol, quantity, price, order.mode, total_amount
        );
        Ok(entry)
    }
}
