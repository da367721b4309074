use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::interval;

use super::scheduling_traits::{ScheduledTask, Scheduler};

/// Tokio-backed scheduler. After the initial delay the first tick fires
/// immediately; subsequent ticks follow the interval.
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn schedule_periodic(
        &self,
        initial_delay: Duration,
        every: Duration,
        task: Arc<dyn ScheduledTask>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                "Task '{}' scheduled every {:?} after an initial {:?}",
                task.name(),
                every,
                initial_delay
            );

            tokio::time::sleep(initial_delay).await;

            let mut ticker = interval(every);
            loop {
                ticker.tick().await;
                debug!("Running scheduled task '{}'", task.name());
                task.run().await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingTask {
        runs: AtomicUsize,
    }

    impl CountingTask {
        fn runs(&self) -> usize {
            self.runs.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ScheduledTask for CountingTask {
        fn name(&self) -> &str {
            "counting"
        }

        async fn run(&self) {
            self.runs.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_first_run_is_immediate_after_delay_then_periodic() {
        let task = Arc::new(CountingTask::default());
        let handle = TokioScheduler.schedule_periodic(
            Duration::ZERO,
            Duration::from_millis(20),
            task.clone(),
        );

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(task.runs() >= 1, "first tick fires without waiting a full interval");

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(task.runs() >= 3);
        handle.abort();
    }

    #[tokio::test]
    async fn test_abort_during_initial_delay_prevents_any_run() {
        let task = Arc::new(CountingTask::default());
        let handle = TokioScheduler.schedule_periodic(
            Duration::from_millis(300),
            Duration::from_millis(10),
            task.clone(),
        );

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(task.runs(), 0, "nothing runs before the initial delay");

        handle.abort();
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(task.runs(), 0);
    }
}
