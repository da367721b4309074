//! Repository traits for settings.

use async_trait::async_trait;

use crate::errors::Result;

/// Repository trait for persisted key/value settings.
///
/// `get_setting` errs with `StoreError::NotFound` for absent keys; defaults
/// are a service concern.
#[async_trait]
pub trait SettingsRepositoryTrait: Send + Sync {
    /// Get a single setting value by key.
    fn get_setting(&self, setting_key: &str) -> Result<String>;

    /// Insert or update a single setting.
    async fn update_setting(&self, setting_key: &str, setting_value: &str) -> Result<()>;
}
