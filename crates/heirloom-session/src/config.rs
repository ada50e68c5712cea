//! Configuration for session activity tracking.

use std::time::Duration;

use crate::error::{Error, Result};

/// Default idle timeout: 10 minutes.
pub const DEFAULT_IDLE_TIMEOUT_MS: u64 = 10 * 60 * 1000;

/// Default interval between background sweeps: 60 seconds.
pub const DEFAULT_SWEEP_INTERVAL_MS: u64 = 60 * 1000;

/// Configuration for the activity tracker and its sweeper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityConfig {
    /// Maximum gap between two accepted requests from the same user.
    /// A request arriving strictly later than this expires the session.
    pub idle_timeout_ms: u64,

    /// Period of the background sweep that evicts abandoned sessions.
    pub sweep_interval_ms: u64,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            idle_timeout_ms: DEFAULT_IDLE_TIMEOUT_MS,
            sweep_interval_ms: DEFAULT_SWEEP_INTERVAL_MS,
        }
    }
}

impl ActivityConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the idle timeout in milliseconds.
    pub fn with_idle_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.idle_timeout_ms = timeout_ms;
        self
    }

    /// Set the sweep interval in milliseconds.
    pub fn with_sweep_interval_ms(mut self, interval_ms: u64) -> Self {
        self.sweep_interval_ms = interval_ms;
        self
    }

    /// Sweep interval as a [`Duration`].
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }

    /// Reject configurations the sweeper cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.sweep_interval_ms == 0 {
            return Err(Error::InvalidConfig(
                "sweep_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
