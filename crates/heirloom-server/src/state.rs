//! Application state shared across handlers.

use std::sync::Arc;

use heirloom_session::ActivityTracker;

use crate::config::ServerConfig;
use crate::error::Result;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,

    /// Per-user session activity tracker.
    pub tracker: ActivityTracker,
}

impl AppState {
    /// Create application state with a tracker built from `config.activity`.
    pub fn new(config: ServerConfig) -> Result<Self> {
        let tracker = ActivityTracker::new(config.activity)?;
        Ok(Self::with_tracker(config, tracker))
    }

    /// Create application state around an existing tracker.
    ///
    /// The tracker's own configuration governs timeouts and sweeping.
    pub fn with_tracker(mut config: ServerConfig, tracker: ActivityTracker) -> Self {
        config.activity = *tracker.config();
        Self {
            config: Arc::new(config),
            tracker,
        }
    }

    /// Get the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
