//! Session activity tracking for Heirloom.
//!
//! This crate keeps a last-seen timestamp per authenticated user and decides,
//! per request, whether the user's session is still live:
//! - A first request from a user opens a session window
//! - Requests within the idle timeout refresh the window
//! - A request after the idle timeout is rejected and the entry dropped
//! - A background sweeper prunes sessions that simply stopped sending requests
//!
//! Nothing is persisted. A process restart forgets every session.
//!
//! # Example
//!
//! ```rust,ignore
//! use heirloom_session::{Activity, ActivityConfig, ActivitySweeper, ActivityTracker};
//!
//! let config = ActivityConfig::default()
//!     .with_idle_timeout_ms(10 * 60 * 1000)
//!     .with_sweep_interval_ms(60 * 1000);
//!
//! let tracker = ActivityTracker::new(config)?;
//! let sweeper = ActivitySweeper::start(tracker.clone());
//!
//! match tracker.check("user-1") {
//!     Activity::Allowed => { /* forward the request */ }
//!     Activity::Expired => { /* ask the client to log in again */ }
//! }
//!
//! sweeper.stop().await;
//! ```

mod clock;
mod config;
mod error;
mod sweeper;
mod table;
mod tracker;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{ActivityConfig, DEFAULT_IDLE_TIMEOUT_MS, DEFAULT_SWEEP_INTERVAL_MS};
pub use error::{Error, Result};
pub use sweeper::ActivitySweeper;
pub use table::{Activity, ActivityStats, ActivityTable};
pub use tracker::ActivityTracker;
