/// Decimal precision for share quantities
pub const QUANTITY_DECIMAL_PRECISION: u32 = 8;

/// Decimal precision for cash amounts
pub const AMOUNT_DECIMAL_PRECISION: u32 = 2;

/// Quantity threshold for significant positions
pub const QUANTITY_THRESHOLD: &str = "0.00000001";

/// Timeout for calls to external collaborators (analyzer, market data, broker)
pub const EXTERNAL_CALL_TIMEOUT_SECS: u64 = 10;
