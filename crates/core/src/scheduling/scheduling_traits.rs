use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// A unit of background work. Implementations log their own outcome; a run
/// never propagates errors into the schedule loop.
#[async_trait]
pub trait ScheduledTask: Send + Sync {
    /// Name used in scheduler logs.
    fn name(&self) -> &str;

    async fn run(&self);
}

/// Schedules tasks to run periodically after an initial delay. Dropping the
/// returned handle does not stop the schedule; abort it to cancel.
pub trait Scheduler: Send + Sync {
    fn schedule_periodic(
        &self,
        initial_delay: Duration,
        every: Duration,
        task: Arc<dyn ScheduledTask>,
    ) -> JoinHandle<()>;
}
