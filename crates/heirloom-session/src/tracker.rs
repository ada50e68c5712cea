//! Clock-driven facade over the activity table.

use std::sync::Arc;

use tracing::debug;

use crate::clock::{Clock, MonotonicClock};
use crate::config::ActivityConfig;
use crate::error::Result;
use crate::table::{Activity, ActivityStats, ActivityTable};

/// Activity tracker shared between request handlers and the sweeper.
///
/// Cloning is cheap; all clones share the same table and clock.
#[derive(Debug, Clone)]
pub struct ActivityTracker {
    table: Arc<ActivityTable>,
    clock: Arc<dyn Clock>,
    config: ActivityConfig,
}

impl ActivityTracker {
    /// Create a tracker reading time from a [`MonotonicClock`].
    pub fn new(config: ActivityConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(MonotonicClock::new()))
    }

    /// Create a tracker with a custom clock.
    pub fn with_clock(config: ActivityConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            table: Arc::new(ActivityTable::new(config.idle_timeout_ms)),
            clock,
            config,
        })
    }

    /// Get the tracker configuration.
    pub fn config(&self) -> &ActivityConfig {
        &self.config
    }

    /// Get the underlying table.
    pub fn table(&self) -> &ActivityTable {
        &self.table
    }

    /// Current reading of the tracker's clock.
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Record a request from `user_id` at the current time.
    pub fn check(&self, user_id: &str) -> Activity {
        let outcome = self.table.record_and_check(user_id, self.now_ms());
        if outcome.is_expired() {
            debug!(user_id = %user_id, "Session expired due to inactivity");
        }
        outcome
    }

    /// Run one sweep at the current time and return how many entries went.
    pub fn sweep_now(&self) -> usize {
        self.table.sweep(self.now_ms())
    }

    /// Last accepted activity for a user.
    pub fn last_seen(&self, user_id: &str) -> Option<u64> {
        self.table.last_seen(user_id)
    }

    /// Time left before `user_id` would expire, if tracked.
    pub fn remaining_ms(&self, user_id: &str) -> Option<u64> {
        let last_seen = self.table.last_seen(user_id)?;
        let idle = self.now_ms().saturating_sub(last_seen);
        Some(self.config.idle_timeout_ms.saturating_sub(idle))
    }

    /// Table counters as of the current time.
    pub fn stats(&self) -> ActivityStats {
        self.table.stats(self.now_ms())
    }
}
