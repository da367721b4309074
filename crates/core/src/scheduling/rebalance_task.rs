use async_trait::async_trait;
use log::{debug, info, warn};
use std::sync::Arc;

use super::scheduling_traits::ScheduledTask;
use crate::rebalance::{RebalanceEngineTrait, RebalanceStatus};

/// Periodic trigger for the rebalance engine. The engine itself decides
/// whether anything needs doing, so running this often is harmless.
pub struct RebalanceTask {
    engine: Arc<dyn RebalanceEngineTrait>,
}

impl RebalanceTask {
    pub fn new(engine: Arc<dyn RebalanceEngineTrait>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl ScheduledTask for RebalanceTask {
    fn name(&self) -> &str {
        "monthly-rebalance"
    }

    async fn run(&self) {
        match self.engine.run().await {
            Ok(outcome) => match outcome.status {
                RebalanceStatus::Skipped => {
                    debug!("Scheduled rebalance skipped: current month already committed");
                }
                RebalanceStatus::Completed => {
                    info!(
                        "Scheduled rebalance completed: {} month(s) caught up, {} symbol error(s)",
                        outcome.months_caught,
                        outcome.symbol_error_count()
                    );
                }
                RebalanceStatus::Failed => {
                    warn!(
                        "Scheduled rebalance failed after {} committed month(s): {}",
                        outcome.months_caught,
                        outcome.error_message.as_deref().unwrap_or("unknown error")
                    );
                }
            },
            Err(e) => {
                warn!("Scheduled rebalance did not run: {}", e);
            }
        }
    }
}
