//! Settings module - persisted engine configuration with defaults.

mod settings_constants;
mod settings_errors;
mod settings_model;
mod settings_service;
mod settings_traits;

#[cfg(test)]
mod settings_service_tests;

pub use settings_constants::*;
pub use settings_errors::SettingsError;
pub use settings_model::{Settings, SettingsUpdate};
pub use settings_service::{SettingsService, SettingsServiceTrait};
pub use settings_traits::SettingsRepositoryTrait;
