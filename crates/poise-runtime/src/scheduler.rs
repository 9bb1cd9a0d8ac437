//! Summary scheduler - drives the cycle path on a fixed period
//!
//! One tokio task, two intervals: the summary interval folds the window
//! into the history, the clock interval advances the elapsed seconds.
//! The first summary fires one full period after spawn. Late ticks are
//! delayed, never bursted.

use std::time::Duration;

use poise_core::StateTime;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, warn};

use crate::{SessionConfig, SharedSession};

/// Spawns the periodic summary task
pub struct SummaryScheduler;

impl SummaryScheduler {
    /// Start the scheduler for `session`
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(session: SharedSession, config: &SessionConfig) -> SchedulerHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let summary_period = config.summary_interval;
        let clock_period = config.clock_interval;

        let task = tokio::spawn(async move {
            // Wall-clock origin advanced by the runtime's monotonic clock
            let origin = StateTime::now();
            let start = Instant::now();
            let now = || origin + start.elapsed();

            let mut summaries = periodic(start, summary_period);
            let mut clock = periodic(start, clock_period);

            loop {
                tokio::select! {
                    biased;

                    _ = shutdown_rx.changed() => break,

                    _ = summaries.tick() => {
                        let summary = session.lock().tick(now());
                        if summary.is_none() {
                            debug!("no summary this cycle");
                        }
                    }

                    _ = clock.tick() => {
                        session.lock().advance_clock(now());
                    }
                }
            }

            debug!("summary scheduler stopped");
        });

        SchedulerHandle {
            shutdown: shutdown_tx,
            task: Some(task),
        }
    }
}

fn periodic(start: Instant, period: Duration) -> Interval {
    let mut interval = interval_at(start + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

/// Handle to a running scheduler; dropping it cancels the task
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl SchedulerHandle {
    /// Cancel the scheduler and wait for the task to finish
    pub async fn shutdown(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("summary scheduler task failed: {}", e);
            }
        }
    }

    /// Has the task exited?
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }
}
