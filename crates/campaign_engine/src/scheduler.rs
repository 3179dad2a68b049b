use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Owns at most one periodic task. Scheduling again replaces the previous
/// task; dropping the scheduler stops it.
#[derive(Debug, Default)]
pub struct PollScheduler {
    active: Option<CancellationToken>,
}

impl PollScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels any running task, then calls `on_tick` every `period`, the first
    /// time one period from now. Must be called inside a tokio runtime.
    pub fn schedule<F>(&mut self, period: Duration, mut on_tick: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.cancel();

        let period = period.max(Duration::from_millis(1));
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = task_cancel.cancelled() => break,
                    _ = ticker.tick() => on_tick(),
                }
            }
        });
        self.active = Some(cancel);
    }

    pub fn cancel(&mut self) {
        if let Some(cancel) = self.active.take() {
            cancel.cancel();
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
