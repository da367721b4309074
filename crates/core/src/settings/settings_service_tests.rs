#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::{Arc, RwLock};

    use crate::errors::{Error, Result as AppResult, StoreError};
    use crate::ledger::TradingMode;
    use crate::settings::{
        SettingsError, SettingsRepositoryTrait, SettingsService, SettingsServiceTrait,
        SettingsUpdate, DEFAULT_TARGET_POSITION_COUNT, DEFAULT_WATCHLIST,
        SETTING_TARGET_POSITION_COUNT,
    };

    #[derive(Default)]
    struct MockSettingsRepository {
        values: RwLock<HashMap<String, String>>,
    }

    #[async_trait]
    impl SettingsRepositoryTrait for MockSettingsRepository {
        fn get_setting(&self, setting_key: &str) -> AppResult<String> {
            self.values
                .read()
                .unwrap()
                .get(setting_key)
                .cloned()
                .ok_or_else(|| StoreError::NotFound(setting_key.to_string()).into())
        }

        async fn update_setting(&self, setting_key: &str, setting_value: &str) -> AppResult<()> {
            self.values
                .write()
                .unwrap()
                .insert(setting_key.to_string(), setting_value.to_string());
            Ok(())
        }
    }

    fn service() -> SettingsService {
        SettingsService::new(Arc::new(MockSettingsRepository::default()))
    }

    #[tokio::test]
    async fn test_defaults_when_nothing_is_configured() {
        let service = service();

        assert_eq!(service.monthly_investment().unwrap(), None);
        assert_eq!(
            service.target_position_count().unwrap(),
            DEFAULT_TARGET_POSITION_COUNT
        );
        assert_eq!(service.trading_mode().unwrap(), TradingMode::Simulated);
        assert_eq!(service.watchlist().unwrap(), DEFAULT_WATCHLIST.to_vec());
    }

    #[tokio::test]
    async fn test_monthly_investment_round_trips_as_decimal() {
        let service = service();

        service.set_monthly_investment(dec!(500.50)).await.unwrap();

        assert_eq!(service.monthly_investment().unwrap(), Some(dec!(500.50)));
    }

    #[tokio::test]
    async fn test_non_positive_monthly_investment_is_rejected() {
        let service = service();

        let result = service.set_monthly_investment(dec!(0)).await;

        assert!(matches!(
            result,
            Err(Error::Settings(SettingsError::InvalidValue { .. }))
        ));
        assert_eq!(service.monthly_investment().unwrap(), None);
    }

    #[tokio::test]
    async fn test_zero_target_position_count_is_rejected() {
        let service = service();

        let result = service.set_target_position_count(0).await;

        assert!(matches!(
            result,
            Err(Error::Settings(SettingsError::InvalidValue { .. }))
        ));
    }

    #[tokio::test]
    async fn test_corrupt_target_position_count_is_an_error() {
        let service = service();

        service
            .set_setting_value(SETTING_TARGET_POSITION_COUNT, "five")
            .await
            .unwrap();
        let result = service.target_position_count();

        assert!(matches!(
            result,
            Err(Error::Settings(SettingsError::InvalidValue { .. }))
        ));
    }

    #[tokio::test]
    async fn test_watchlist_round_trips_and_trims() {
        let service = service();

        service
            .set_watchlist(&["KO".to_string(), " PG ".to_string()])
            .await
            .unwrap();

        assert_eq!(service.watchlist().unwrap(), vec!["KO", "PG"]);
    }

    #[tokio::test]
    async fn test_empty_watchlist_is_rejected() {
        let service = service();

        let result = service.set_watchlist(&[]).await;

        assert!(matches!(
            result,
            Err(Error::Settings(SettingsError::InvalidValue { .. }))
        ));
    }

    #[tokio::test]
    async fn test_live_trading_mode_cannot_be_reverted() {
        let service = service();

        service.set_trading_mode(TradingMode::Live).await.unwrap();
        let result = service.set_trading_mode(TradingMode::Simulated).await;

        assert!(matches!(
            result,
            Err(Error::Settings(SettingsError::LiveModeIrreversible))
        ));
        assert_eq!(service.trading_mode().unwrap(), TradingMode::Live);

        // Re-asserting LIVE stays allowed.
        service.set_trading_mode(TradingMode::Live).await.unwrap();
    }

    #[tokio::test]
    async fn test_simulated_can_be_reasserted_before_going_live() {
        let service = service();

        service
            .set_trading_mode(TradingMode::Simulated)
            .await
            .unwrap();

        assert_eq!(service.trading_mode().unwrap(), TradingMode::Simulated);
    }

    #[tokio::test]
    async fn test_settings_aggregate_reflects_stored_values() {
        let service = service();

        service.set_monthly_investment(dec!(1000)).await.unwrap();
        service.set_target_position_count(3).await.unwrap();
        service
            .set_watchlist(&["KO".to_string(), "PG".to_string()])
            .await
            .unwrap();

        let settings = service.get_settings().unwrap();
        assert_eq!(settings.monthly_investment, Some(dec!(1000)));
        assert_eq!(settings.target_position_count, 3);
        assert_eq!(settings.watchlist, vec!["KO", "PG"]);
        assert_eq!(settings.trading_mode, TradingMode::Simulated);
    }

    #[tokio::test]
    async fn test_partial_update_leaves_other_settings_untouched() {
        let service = service();
        service.set_monthly_investment(dec!(1000)).await.unwrap();

        service
            .update_settings(&SettingsUpdate {
                target_position_count: Some(7),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(service.monthly_investment().unwrap(), Some(dec!(1000)));
        assert_eq!(service.target_position_count().unwrap(), 7);
        assert_eq!(service.watchlist().unwrap(), DEFAULT_WATCHLIST.to_vec());
    }

    #[tokio::test]
    async fn test_update_settings_enforces_setter_validation() {
        let service = service();
        service.set_trading_mode(TradingMode::Live).await.unwrap();

        let result = service
            .update_settings(&SettingsUpdate {
                trading_mode: Some(TradingMode::Simulated),
                ..Default::default()
            })
            .await;

        assert!(matches!(
            result,
            Err(Error::Settings(SettingsError::LiveModeIrreversible))
        ));
        assert_eq!(service.trading_mode().unwrap(), TradingMode::Live);
    }
}
