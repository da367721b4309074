//! In-memory snapshot store.

use std::sync::RwLock;

use async_trait::async_trait;
use dripfolio_core::snapshots::{PortfolioSnapshot, SnapshotKind, SnapshotRepositoryTrait};
use dripfolio_core::Result;

use crate::lock_poisoned;

/// Snapshot rows. The latest MONTHLY_REBALANCE row doubles as the
/// idempotency marker, so `get_latest` selects by effective timestamp, not
/// by write order.
#[derive(Default)]
pub struct MemorySnapshotRepository {
    snapshots: RwLock<Vec<PortfolioSnapshot>>,
}

impl MemorySnapshotRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotRepositoryTrait for MemorySnapshotRepository {
    async fn commit(&self, snapshot: PortfolioSnapshot) -> Result<PortfolioSnapshot> {
        let mut snapshots = self
            .snapshots
            .write()
            .map_err(|_| lock_poisoned("snapshot"))?;
        snapshots.push(snapshot.clone());
        Ok(snapshot)
    }

    fn get_latest(&self, kind: Option<SnapshotKind>) -> Result<Option<PortfolioSnapshot>> {
        let snapshots = self
            .snapshots
            .read()
            .map_err(|_| lock_poisoned("snapshot"))?;
        Ok(snapshots
            .iter()
            .filter(|s| kind.map_or(true, |k| s.kind == k))
            .max_by_key(|s| s.timestamp)
            .cloned())
    }

    fn get_all(&self) -> Result<Vec<PortfolioSnapshot>> {
        let snapshots = self
            .snapshots
            .read()
            .map_err(|_| lock_poisoned("snapshot"))?;
        let mut all = snapshots.clone();
        all.sort_by_key(|s| s.timestamp);
        Ok(all)
    }
}
