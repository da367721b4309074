#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::{DateTime, NaiveDate, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, RwLock};

    use crate::errors::Error;
    use crate::ledger::{
        EntryKind, LedgerEntry, LedgerServiceTrait, NewLedgerEntry, TradingMode,
    };
    use crate::orders::{
        BrokerBridgeTrait, BrokerOrderResult, OrderError, OrderExecutor, OrderExecutorTrait,
        OrderRequest, OrderSide,
    };
    use crate::positions::{Position, PositionServiceTrait};
    use crate::pricing::MarketDataProviderTrait;
    use crate::Result as AppResult;

    struct MockLedger {
        entries: RwLock<Vec<LedgerEntry>>,
    }

    impl MockLedger {
        fn with_cash(amount: Decimal) -> Arc<Self> {
            let ledger = Self {
                entries: RwLock::new(Vec::new()),
            };
            ledger
                .entries
                .write()
                .unwrap()
                .push(NewLedgerEntry::deposit(amount, None).into_entry());
            Arc::new(ledger)
        }

        fn entries(&self) -> Vec<LedgerEntry> {
            self.entries.read().unwrap().clone()
        }
    }

    #[async_trait]
    impl LedgerServiceTrait for MockLedger {
        async fn append(&self, draft: NewLedgerEntry) -> AppResult<LedgerEntry> {
            draft.validate()?;
            let entry = draft.into_entry();
            self.entries.write().unwrap().push(entry.clone());
            Ok(entry)
        }

        async fn record_deposit(
            &self,
            amount: Decimal,
            notes: Option<String>,
        ) -> AppResult<LedgerEntry> {
            self.append(NewLedgerEntry::deposit(amount, notes)).await
        }

        fn cash_balance(&self) -> AppResult<Decimal> {
            Ok(self
                .entries
                .read()
                .unwrap()
                .iter()
                .map(LedgerEntry::cash_effect)
                .sum())
        }

        fn get_entries(&self) -> AppResult<Vec<LedgerEntry>> {
            Ok(self.entries())
        }

        fn get_entries_of_kind(&self, _kind: EntryKind) -> AppResult<Vec<LedgerEntry>> {
            unimplemented!()
        }

        fn get_entries_for_symbol(&self, _symbol: &str) -> AppResult<Vec<LedgerEntry>> {
            unimplemented!()
        }
    }

    #[derive(Default)]
    struct MockPositions {
        calls: RwLock<Vec<(OrderSide, String, Decimal, Decimal)>>,
    }

    impl MockPositions {
        fn calls(&self) -> Vec<(OrderSide, String, Decimal, Decimal)> {
            self.calls.read().unwrap().clone()
        }
    }

    #[async_trait]
    impl PositionServiceTrait for MockPositions {
        async fn apply_buy(
            &self,
            symbol: &str,
            quantity: Decimal,
            price: Decimal,
            at: DateTime<Utc>,
        ) -> AppResult<Position> {
            self.calls
                .write()
                .unwrap()
                .push((OrderSide::Buy, symbol.to_string(), quantity, price));
            Ok(Position::opened(symbol, quantity, price, at))
        }

        async fn apply_sell(
            &self,
            symbol: &str,
            quantity: Decimal,
            price: Decimal,
            at: DateTime<Utc>,
        ) -> AppResult<Position> {
            self.calls
                .write()
                .unwrap()
                .push((OrderSide::Sell, symbol.to_string(), quantity, price));
            Ok(Position::opened(symbol, Decimal::ZERO, price, at))
        }

        fn get_current_positions(&self) -> AppResult<Vec<Position>> {
            Ok(Vec::new())
        }

        fn get_latest_for_symbol(&self, _symbol: &str) -> AppResult<Option<Position>> {
            Ok(None)
        }
    }

    struct MockProvider {
        live_price: Option<Decimal>,
        available: bool,
        live_calls: AtomicUsize,
    }

    impl MockProvider {
        fn new(live_price: Option<Decimal>, available: bool) -> Arc<Self> {
            Arc::new(Self {
                live_price,
                available,
                live_calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl MarketDataProviderTrait for MockProvider {
        async fn historical_close(
            &self,
            _symbol: &str,
            _date: NaiveDate,
        ) -> AppResult<Option<Decimal>> {
            unimplemented!()
        }

        async fn live_quote(&self, _symbol: &str) -> AppResult<Option<Decimal>> {
            self.live_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.live_price)
        }

        fn is_available(&self) -> bool {
            self.available
        }
    }

    struct MockBroker {
        scripted: BrokerOrderResult,
        calls: AtomicUsize,
    }

    impl MockBroker {
        fn filling(filled_quantity: Decimal, fill_price: Decimal) -> Arc<Self> {
            Arc::new(Self {
                scripted: BrokerOrderResult::Filled {
                    filled_quantity,
                    fill_price,
                },
                calls: AtomicUsize::new(0),
            })
        }

        fn rejecting(reason: &str) -> Arc<Self> {
            Arc::new(Self {
                scripted: BrokerOrderResult::Rejected {
                    reason: reason.to_string(),
                },
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl BrokerBridgeTrait for MockBroker {
        async fn place_order(
            &self,
            _side: OrderSide,
            _symbol: &str,
            _quantity: Decimal,
            _price: Decimal,
        ) -> AppResult<BrokerOrderResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.scripted.clone())
        }
    }

    fn executor(
        ledger: &Arc<MockLedger>,
        positions: &Arc<MockPositions>,
        provider: &Arc<MockProvider>,
        broker: &Arc<MockBroker>,
    ) -> OrderExecutor {
        OrderExecutor::new(
            ledger.clone(),
            positions.clone(),
            provider.clone(),
            broker.clone(),
        )
    }

    #[tokio::test]
    async fn test_simulated_buy_appends_entry_and_updates_position() {
        let ledger = MockLedger::with_cash(dec!(10000));
        let positions = Arc::new(MockPositions::default());
        let provider = MockProvider::new(None, false);
        let broker = MockBroker::rejecting("must not be reached");
        let executor = executor(&ledger, &positions, &provider, &broker);

        let order =
            OrderRequest::buy("KO", dec!(10), TradingMode::Simulated).with_price(dec!(50.25));
        let entry = executor.execute(order).await.unwrap();

        assert_eq!(entry.kind, EntryKind::Buy);
        assert_eq!(entry.symbol.as_deref(), Some("KO"));
        assert_eq!(entry.total_amount, dec!(502.50));
        assert_eq!(entry.mode, TradingMode::Simulated);
        assert_eq!(ledger.entries().len(), 2);
        assert_eq!(ledger.cash_balance().unwrap(), dec!(9497.50));
        assert_eq!(
            positions.calls(),
            vec![(OrderSide::Buy, "KO".to_string(), dec!(10), dec!(50.25))]
        );
        assert_eq!(broker.calls.load(Ordering::SeqCst), 0);
        assert_eq!(provider.live_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_total_amount_rounds_to_cents() {
        let ledger = MockLedger::with_cash(dec!(10000));
        let positions = Arc::new(MockPositions::default());
        let provider = MockProvider::new(None, false);
        let broker = MockBroker::rejecting("must not be reached");
        let executor = executor(&ledger, &positions, &provider, &broker);

        // 0.33333333 * 300 = 99.999999, which records as 100.00 cash out.
        let order = OrderRequest::buy("PG", dec!(0.33333333), TradingMode::Simulated)
            .with_price(dec!(300));
        let entry = executor.execute(order).await.unwrap();

        assert_eq!(entry.total_amount, dec!(100.00));
        assert_eq!(ledger.cash_balance().unwrap(), dec!(9900.00));
    }

    #[tokio::test]
    async fn test_buy_rejected_when_cash_insufficient() {
        let ledger = MockLedger::with_cash(dec!(100));
        let positions = Arc::new(MockPositions::default());
        let provider = MockProvider::new(None, false);
        let broker = MockBroker::rejecting("must not be reached");
        let executor = executor(&ledger, &positions, &provider, &broker);

        let order =
            OrderRequest::buy("JNJ", dec!(10), TradingMode::Simulated).with_price(dec!(50.25));
        let result = executor.execute(order).await;

        assert!(matches!(
            result,
            Err(Error::Order(OrderError::InsufficientCash {
                required,
                available,
            })) if required == dec!(502.50) && available == dec!(100)
        ));
        assert_eq!(ledger.entries().len(), 1);
        assert!(positions.calls().is_empty());
    }

    #[tokio::test]
    async fn test_live_rejection_writes_nothing() {
        let ledger = MockLedger::with_cash(dec!(10000));
        let positions = Arc::new(MockPositions::default());
        let provider = MockProvider::new(None, false);
        let broker = MockBroker::rejecting("instrument not tradable");
        let executor = executor(&ledger, &positions, &provider, &broker);

        let order = OrderRequest::buy("KO", dec!(10), TradingMode::Live).with_price(dec!(50));
        let result = executor.execute(order).await;

        assert!(matches!(
            result,
            Err(Error::Order(OrderError::BrokerRejected(reason))) if reason == "instrument not tradable"
        ));
        assert_eq!(broker.calls.load(Ordering::SeqCst), 1);
        assert_eq!(ledger.entries().len(), 1);
        assert!(positions.calls().is_empty());
    }

    #[tokio::test]
    async fn test_live_fill_overrides_requested_quantity_and_price() {
        let ledger = MockLedger::with_cash(dec!(10000));
        let positions = Arc::new(MockPositions::default());
        let provider = MockProvider::new(None, false);
        let broker = MockBroker::filling(dec!(9.5), dec!(50.10));
        let executor = executor(&ledger, &positions, &provider, &broker);

        let order = OrderRequest::buy("KO", dec!(10), TradingMode::Live).with_price(dec!(50));
        let entry = executor.execute(order).await.unwrap();

        assert_eq!(entry.quantity, Some(dec!(9.5)));
        assert_eq!(entry.price, Some(dec!(50.10)));
        assert_eq!(entry.total_amount, dec!(475.95));
        assert_eq!(entry.mode, TradingMode::Live);
        assert_eq!(
            positions.calls(),
            vec![(OrderSide::Buy, "KO".to_string(), dec!(9.5), dec!(50.10))]
        );
    }

    #[tokio::test]
    async fn test_live_buy_with_insufficient_cash_never_reaches_broker() {
        let ledger = MockLedger::with_cash(dec!(100));
        let positions = Arc::new(MockPositions::default());
        let provider = MockProvider::new(None, false);
        let broker = MockBroker::filling(dec!(10), dec!(50.25));
        let executor = executor(&ledger, &positions, &provider, &broker);

        let order =
            OrderRequest::buy("JNJ", dec!(10), TradingMode::Live).with_price(dec!(50.25));
        let result = executor.execute(order).await;

        assert!(matches!(
            result,
            Err(Error::Order(OrderError::InsufficientCash {
                required,
                available,
            })) if required == dec!(502.50) && available == dec!(100)
        ));
        assert_eq!(broker.calls.load(Ordering::SeqCst), 0);
        assert_eq!(ledger.entries().len(), 1);
        assert!(positions.calls().is_empty());
    }

    #[tokio::test]
    async fn test_live_fill_beyond_screened_cash_is_still_recorded() {
        let ledger = MockLedger::with_cash(dec!(500));
        let positions = Arc::new(MockPositions::default());
        let provider = MockProvider::new(None, false);
        let broker = MockBroker::filling(dec!(10), dec!(52));
        let executor = executor(&ledger, &positions, &provider, &broker);

        let order = OrderRequest::buy("KO", dec!(10), TradingMode::Live).with_price(dec!(49));
        let entry = executor.execute(order).await.unwrap();

        assert_eq!(entry.total_amount, dec!(520.00));
        assert_eq!(ledger.cash_balance().unwrap(), dec!(-20.00));
        assert_eq!(
            positions.calls(),
            vec![(OrderSide::Buy, "KO".to_string(), dec!(10), dec!(52))]
        );
    }

    #[tokio::test]
    async fn test_missing_price_uses_live_quote() {
        let ledger = MockLedger::with_cash(dec!(10000));
        let positions = Arc::new(MockPositions::default());
        let provider = MockProvider::new(Some(dec!(42.50)), true);
        let broker = MockBroker::rejecting("must not be reached");
        let executor = executor(&ledger, &positions, &provider, &broker);

        let order = OrderRequest::buy("O", dec!(2), TradingMode::Simulated);
        let entry = executor.execute(order).await.unwrap();

        assert_eq!(entry.price, Some(dec!(42.50)));
        assert_eq!(entry.total_amount, dec!(85.00));
        assert_eq!(provider.live_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_price_without_quote_is_unpriced() {
        let ledger = MockLedger::with_cash(dec!(10000));
        let positions = Arc::new(MockPositions::default());
        let provider = MockProvider::new(None, true);
        let broker = MockBroker::rejecting("must not be reached");
        let executor = executor(&ledger, &positions, &provider, &broker);

        let order = OrderRequest::buy("XOM", dec!(2), TradingMode::Simulated);
        let result = executor.execute(order).await;

        assert!(matches!(
            result,
            Err(Error::Order(OrderError::Unpriced(symbol))) if symbol == "XOM"
        ));
        assert_eq!(ledger.entries().len(), 1);
        assert!(positions.calls().is_empty());
    }

    #[tokio::test]
    async fn test_sell_credits_cash_and_updates_position() {
        let ledger = MockLedger::with_cash(dec!(1000));
        let positions = Arc::new(MockPositions::default());
        let provider = MockProvider::new(None, false);
        let broker = MockBroker::rejecting("must not be reached");
        let executor = executor(&ledger, &positions, &provider, &broker);

        let order =
            OrderRequest::sell("PEP", dec!(4), TradingMode::Simulated).with_price(dec!(55));
        let entry = executor.execute(order).await.unwrap();

        assert_eq!(entry.kind, EntryKind::Sell);
        assert_eq!(entry.total_amount, dec!(220.00));
        assert_eq!(ledger.cash_balance().unwrap(), dec!(1220.00));
        assert_eq!(
            positions.calls(),
            vec![(OrderSide::Sell, "PEP".to_string(), dec!(4), dec!(55))]
        );
    }

    #[tokio::test]
    async fn test_zero_quantity_is_rejected_before_pricing() {
        let ledger = MockLedger::with_cash(dec!(1000));
        let positions = Arc::new(MockPositions::default());
        let provider = MockProvider::new(Some(dec!(10)), true);
        let broker = MockBroker::rejecting("must not be reached");
        let executor = executor(&ledger, &positions, &provider, &broker);

        let order = OrderRequest::buy("KO", Decimal::ZERO, TradingMode::Simulated);
        let result = executor.execute(order).await;

        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(provider.live_calls.load(Ordering::SeqCst), 0);
        assert_eq!(ledger.entries().len(), 1);
    }

    #[tokio::test]
    async fn test_carried_timestamp_lands_on_entry() {
        let ledger = MockLedger::with_cash(dec!(10000));
        let positions = Arc::new(MockPositions::default());
        let provider = MockProvider::new(None, false);
        let broker = MockBroker::rejecting("must not be reached");
        let executor = executor(&ledger, &positions, &provider, &broker);

        let at = DateTime::parse_from_rfc3339("2024-02-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let order = OrderRequest::buy("KO", dec!(1), TradingMode::Simulated)
            .with_price(dec!(60))
            .with_executed_at(at);
        let entry = executor.execute(order).await.unwrap();

        assert_eq!(entry.timestamp, at);
    }
}
