use thiserror::Error;

/// Errors specific to settings reads and writes.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// LIVE is a one-way switch; there is no path back to SIMULATED.
    #[error("Trading mode is LIVE and cannot be reverted to SIMULATED")]
    LiveModeIrreversible,

    #[error("Invalid value for setting '{key}': {message}")]
    InvalidValue { key: String, message: String },
}
