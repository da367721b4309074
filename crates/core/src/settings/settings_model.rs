use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::TradingMode;

/// Aggregated view of the engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Cash invested per rebalance month. Rebalancing refuses to run while
    /// this is unset.
    pub monthly_investment: Option<Decimal>,
    pub target_position_count: usize,
    pub watchlist: Vec<String>,
    pub trading_mode: TradingMode,
}

/// Partial settings update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub monthly_investment: Option<Decimal>,
    pub target_position_count: Option<usize>,
    pub watchlist: Option<Vec<String>>,
    pub trading_mode: Option<TradingMode>,
}
