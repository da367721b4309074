use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::errors::{Error, Result};

struct CachedValue<V> {
    value: V,
    refreshed_at: Instant,
}

/// Thread-safe map of `key -> value` where every entry carries its refresh
/// instant. Readers pass the TTL they are willing to tolerate, so one cache
/// can serve callers with different staleness requirements.
///
/// The lock is never held across an await; two concurrent refreshes of the
/// same key may race, in which case the last write wins.
pub struct TtlCache<K, V> {
    entries: RwLock<HashMap<K, CachedValue<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the cached value for `key` if it was refreshed within `ttl`.
    pub fn get(&self, key: &K, ttl: Duration) -> Result<Option<V>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| Error::Unexpected(format!("Cache lock poisoned: {}", e)))?;

        Ok(entries
            .get(key)
            .filter(|cached| cached.refreshed_at.elapsed() <= ttl)
            .map(|cached| cached.value.clone()))
    }

    /// Stores `value` for `key`, stamping it with the current instant.
    pub fn insert(&self, key: K, value: V) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| Error::Unexpected(format!("Cache lock poisoned: {}", e)))?;

        entries.insert(
            key,
            CachedValue {
                value,
                refreshed_at: Instant::now(),
            },
        );
        Ok(())
    }

    /// Returns the fresh cached value for `key`, or runs `refresh` and caches
    /// its result. A failed refresh propagates without caching anything.
    pub async fn get_or_refresh<F, Fut>(&self, key: K, ttl: Duration, refresh: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        if let Some(value) = self.get(&key, ttl)? {
            return Ok(value);
        }

        let value = refresh().await?;
        self.insert(key, value.clone())?;
        Ok(value)
    }
}

impl<K, V> Default for TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
