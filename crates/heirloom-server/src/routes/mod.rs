//! API routes.

pub mod health;
pub mod openapi;
pub mod session;

pub use health::{HealthResponse, health_routes};
pub use openapi::{ApiDoc, swagger_ui};
pub use session::{
    SessionInfo, SessionStatsResponse, get_session_handler, session_stats_handler,
};
