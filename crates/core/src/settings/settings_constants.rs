//! Setting keys and defaults.

/// Cash to invest each month, stored as a decimal string.
pub const SETTING_MONTHLY_INVESTMENT: &str = "monthly_investment";

/// Maximum number of symbols bought per rebalance month.
pub const SETTING_TARGET_POSITION_COUNT: &str = "target_position_count";

/// Comma-separated list of candidate symbols.
pub const SETTING_WATCHLIST: &str = "watchlist";

/// SIMULATED or LIVE. Switching to LIVE is permanent.
pub const SETTING_TRADING_MODE: &str = "trading_mode";

pub const DEFAULT_TARGET_POSITION_COUNT: usize = 5;

/// Dividend payers used until the user configures a watchlist.
pub const DEFAULT_WATCHLIST: [&str; 10] = [
    "KO", "PG", "JNJ", "O", "XOM", "PEP", "MMM", "T", "VZ", "ABBV",
];
