mod rebalance_task;
mod scheduling_traits;
mod tokio_scheduler;

pub use rebalance_task::RebalanceTask;
pub use scheduling_traits::{ScheduledTask, Scheduler};
pub use tokio_scheduler::TokioScheduler;
