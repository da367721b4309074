//! In-memory position store.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use dripfolio_core::positions::{Position, PositionRepositoryTrait};
use dripfolio_core::Result;

use crate::lock_poisoned;

/// Append-only position rows, one per mutation. "Latest" is insertion order:
/// the writer appends mutations in the order it applied them.
#[derive(Default)]
pub struct MemoryPositionRepository {
    rows: RwLock<Vec<Position>>,
}

impl MemoryPositionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PositionRepositoryTrait for MemoryPositionRepository {
    async fn append(&self, position: Position) -> Result<Position> {
        let mut rows = self.rows.write().map_err(|_| lock_poisoned("position"))?;
        rows.push(position.clone());
        Ok(position)
    }

    fn get_latest_for_symbol(&self, symbol: &str) -> Result<Option<Position>> {
        let rows = self.rows.read().map_err(|_| lock_poisoned("position"))?;
        Ok(rows.iter().rev().find(|p| p.symbol == symbol).cloned())
    }

    fn get_current_positions(&self) -> Result<Vec<Position>> {
        let rows = self.rows.read().map_err(|_| lock_poisoned("position"))?;

        let mut latest: HashMap<&str, &Position> = HashMap::new();
        for row in rows.iter() {
            latest.insert(row.symbol.as_str(), row);
        }

        let mut current: Vec<Position> = latest
            .into_values()
            .filter(|p| p.is_open())
            .cloned()
            .collect();
        current.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        Ok(current)
    }

    fn get_history_for_symbol(&self, symbol: &str) -> Result<Vec<Position>> {
        let rows = self.rows.read().map_err(|_| lock_poisoned("position"))?;
        Ok(rows.iter().filter(|p| p.symbol == symbol).cloned().collect())
    }
}
