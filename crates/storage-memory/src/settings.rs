//! In-memory key/value settings store.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use dripfolio_core::errors::StoreError;
use dripfolio_core::settings::SettingsRepositoryTrait;
use dripfolio_core::Result;

use crate::lock_poisoned;

#[derive(Default)]
pub struct MemorySettingsRepository {
    values: RwLock<HashMap<String, String>>,
}

impl MemorySettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsRepositoryTrait for MemorySettingsRepository {
    fn get_setting(&self, setting_key: &str) -> Result<String> {
        let values = self.values.read().map_err(|_| lock_poisoned("settings"))?;
        values
            .get(setting_key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("Setting '{}' not found", setting_key)).into())
    }

    async fn update_setting(&self, setting_key: &str, setting_value: &str) -> Result<()> {
        let mut values = self.values.write().map_err(|_| lock_poisoned("settings"))?;
        values.insert(setting_key.to_string(), setting_value.to_string());
        Ok(())
    }
}
