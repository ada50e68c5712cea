//! Background sweep of abandoned sessions.

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::tracker::ActivityTracker;

/// Handle to the periodic sweep task.
///
/// The task runs on a single interval timer, so sweeps never overlap. Call
/// [`stop`](Self::stop) to cancel and join it; dropping the handle cancels
/// it without waiting.
#[derive(Debug)]
pub struct ActivitySweeper {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl ActivitySweeper {
    /// Spawn the sweep task on the current tokio runtime.
    pub fn start(tracker: ActivityTracker) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let period = tracker.config().sweep_interval();

        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick fires immediately; defer the first sweep by one interval.
            ticker.tick().await;

            debug!(interval_ms = period.as_millis() as u64, "Activity sweeper started");

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let removed = tracker.sweep_now();
                        if removed > 0 {
                            info!(removed, remaining = tracker.table().len(), "Swept idle sessions");
                        } else {
                            debug!(remaining = tracker.table().len(), "Activity sweep found nothing stale");
                        }
                    }
                }
            }

            debug!("Activity sweeper stopped");
        });

        Self {
            cancel,
            handle: Some(handle),
        }
    }

    /// Check if the sweep task is still running.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Cancel the sweep task and wait for it to finish.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take()
            && let Err(e) = handle.await
        {
            warn!(error = %e, "Activity sweeper task ended abnormally");
        }
    }
}

impl Drop for ActivitySweeper {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
