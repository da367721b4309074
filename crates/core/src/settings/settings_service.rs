use super::settings_constants::*;
use super::SettingsRepositoryTrait;
use crate::errors::{Error, Result, StoreError};
use crate::ledger::TradingMode;
use crate::settings::{Settings, SettingsError, SettingsUpdate};
use async_trait::async_trait;
use log::info;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;

// Define the trait for SettingsService
#[async_trait]
pub trait SettingsServiceTrait: Send + Sync {
    fn get_settings(&self) -> Result<Settings>;

    async fn update_settings(&self, update: &SettingsUpdate) -> Result<()>;

    /// Cash to invest per rebalance month. None until configured.
    fn monthly_investment(&self) -> Result<Option<Decimal>>;

    async fn set_monthly_investment(&self, amount: Decimal) -> Result<()>;

    fn target_position_count(&self) -> Result<usize>;

    async fn set_target_position_count(&self, count: usize) -> Result<()>;

    fn watchlist(&self) -> Result<Vec<String>>;

    async fn set_watchlist(&self, symbols: &[String]) -> Result<()>;

    fn trading_mode(&self) -> Result<TradingMode>;

    /// Switching to LIVE is permanent; a later switch back to SIMULATED is
    /// rejected.
    async fn set_trading_mode(&self, mode: TradingMode) -> Result<()>;

    /// Get a single setting value by key. Returns None if not found.
    fn get_setting_value(&self, key: &str) -> Result<Option<String>>;

    /// Set a single setting value by key.
    async fn set_setting_value(&self, key: &str, value: &str) -> Result<()>;
}

pub struct SettingsService {
    settings_repository: Arc<dyn SettingsRepositoryTrait>,
}

// Implement the trait for SettingsService
#[async_trait]
impl SettingsServiceTrait for SettingsService {
    fn get_settings(&self) -> Result<Settings> {
        Ok(Settings {
            monthly_investment: self.monthly_investment()?,
            target_position_count: self.target_position_count()?,
            watchlist: self.watchlist()?,
            trading_mode: self.trading_mode()?,
        })
    }

    async fn update_settings(&self, update: &SettingsUpdate) -> Result<()> {
        if let Some(amount) = update.monthly_investment {
            self.set_monthly_investment(amount).await?;
        }
        if let Some(count) = update.target_position_count {
            self.set_target_position_count(count).await?;
        }
        if let Some(ref symbols) = update.watchlist {
            self.set_watchlist(symbols).await?;
        }
        if let Some(mode) = update.trading_mode {
            self.set_trading_mode(mode).await?;
        }
        Ok(())
    }

    fn monthly_investment(&self) -> Result<Option<Decimal>> {
        match self.get_setting_value(SETTING_MONTHLY_INVESTMENT)? {
            Some(value) => Ok(Some(Decimal::from_str(&value)?)),
            None => Ok(None),
        }
    }

    async fn set_monthly_investment(&self, amount: Decimal) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(SettingsError::InvalidValue {
                key: SETTING_MONTHLY_INVESTMENT.to_string(),
                message: "Monthly investment must be positive".to_string(),
            }
            .into());
        }
        self.set_setting_value(SETTING_MONTHLY_INVESTMENT, &amount.to_string())
            .await
    }

    fn target_position_count(&self) -> Result<usize> {
        match self.settings_repository.get_setting(SETTING_TARGET_POSITION_COUNT) {
            Ok(value) => value.parse().map_err(|_| {
                SettingsError::InvalidValue {
                    key: SETTING_TARGET_POSITION_COUNT.to_string(),
                    message: format!("\"{}\" is not a valid position count", value),
                }
                .into()
            }),
            Err(Error::Store(StoreError::NotFound(_))) => Ok(DEFAULT_TARGET_POSITION_COUNT),
            Err(e) => Err(e),
        }
    }

    async fn set_target_position_count(&self, count: usize) -> Result<()> {
        if count == 0 {
            return Err(SettingsError::InvalidValue {
                key: SETTING_TARGET_POSITION_COUNT.to_string(),
                message: "Target position count must be at least 1".to_string(),
            }
            .into());
        }
        self.set_setting_value(SETTING_TARGET_POSITION_COUNT, &count.to_string())
            .await
    }

    fn watchlist(&self) -> Result<Vec<String>> {
        match self.get_setting_value(SETTING_WATCHLIST)? {
            Some(value) => Ok(value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()),
            None => Ok(DEFAULT_WATCHLIST.iter().map(|s| s.to_string()).collect()),
        }
    }

    async fn set_watchlist(&self, symbols: &[String]) -> Result<()> {
        if symbols.is_empty() || symbols.iter().any(|s| s.trim().is_empty()) {
            return Err(SettingsError::InvalidValue {
                key: SETTING_WATCHLIST.to_string(),
                message: "Watchlist must contain at least one non-empty symbol".to_string(),
            }
            .into());
        }
        let joined = symbols
            .iter()
            .map(|s| s.trim())
            .collect::<Vec<_>>()
            .join(",");
        self.set_setting_value(SETTING_WATCHLIST, &joined).await
    }

    fn trading_mode(&self) -> Result<TradingMode> {
        match self.get_setting_value(SETTING_TRADING_MODE)? {
            Some(value) => Ok(value.parse()?),
            None => Ok(TradingMode::default()),
        }
    }

    async fn set_trading_mode(&self, mode: TradingMode) -> Result<()> {
        let current = self.trading_mode()?;
        if current == TradingMode::Live && mode == TradingMode::Simulated {
            return Err(SettingsError::LiveModeIrreversible.into());
        }
        if current != TradingMode::Live && mode == TradingMode::Live {
            info!("Trading mode switched to LIVE; orders will be placed with the broker");
        }
        self.set_setting_value(SETTING_TRADING_MODE, &mode.to_string())
            .await
    }

    fn get_setting_value(&self, key: &str) -> Result<Option<String>> {
        match self.settings_repository.get_setting(key) {
            Ok(value) => Ok(Some(value)),
            Err(Error::Store(StoreError::NotFound(_))) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn set_setting_value(&self, key: &str, value: &str) -> Result<()> {
        self.settings_repository.update_setting(key, value).await
    }
}

impl SettingsService {
    pub fn new(settings_repository: Arc<dyn SettingsRepositoryTrait>) -> Self {
        SettingsService {
            settings_repository,
        }
    }
}
