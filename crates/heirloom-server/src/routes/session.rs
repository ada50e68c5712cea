//! Session activity endpoints.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::AuthIdentity;
use crate::error::{ErrorResponse, Result, ServerError};
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Response Types
// ─────────────────────────────────────────────────────────────────────────────

/// The caller's own session activity.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    /// Resolved user id.
    pub user_id: String,
    /// Tracker clock reading of the last accepted request.
    pub last_seen_ms: u64,
    /// Configured idle timeout.
    pub idle_timeout_ms: u64,
    /// Idle time left before the next request would be rejected.
    pub remaining_ms: u64,
}

/// Activity table counters.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatsResponse {
    /// Users currently tracked.
    pub tracked: usize,
    /// Tracked users already past the idle timeout, awaiting a sweep.
    pub stale: usize,
    /// Configured idle timeout.
    pub idle_timeout_ms: u64,
    /// Configured sweep interval.
    pub sweep_interval_ms: u64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/session - Describe the caller's session.
#[utoipa::path(
    get,
    path = "/api/v1/session",
    responses(
        (status = 200, description = "Caller session activity", body = SessionInfo),
        (status = 401, description = "Unauthenticated or session expired", body = ErrorResponse),
    ),
    security(("bearer_auth" = [])),
    tag = "session"
)]
pub async fn get_session_handler(
    State(state): State<AppState>,
    AuthIdentity(identity): AuthIdentity,
) -> Result<Json<SessionInfo>> {
    let tracker = &state.tracker;
    let user_id = identity.user_id;

    // The activity gate has already recorded this request.
    let last_seen_ms = tracker
        .last_seen(&user_id)
        .ok_or_else(|| ServerError::NotFound(format!("No activity recorded for {}", user_id)))?;
    let remaining_ms = tracker.remaining_ms(&user_id).unwrap_or(0);

    Ok(Json(SessionInfo {
        user_id,
        last_seen_ms,
        idle_timeout_ms: tracker.config().idle_timeout_ms,
        remaining_ms,
    }))
}

/// GET /api/v1/session/stats - Activity table counters.
#[utoipa::path(
    get,
    path = "/api/v1/session/stats",
    responses(
        (status = 200, description = "Activity table counters", body = SessionStatsResponse),
    ),
    tag = "session"
)]
pub async fn session_stats_handler(State(state): State<AppState>) -> Json<SessionStatsResponse> {
    let stats = state.tracker.stats();
    let config = state.tracker.config();

    Json(SessionStatsResponse {
        tracked: stats.tracked,
        stale: stats.stale,
        idle_timeout_ms: config.idle_timeout_ms,
        sweep_interval_ms: config.sweep_interval_ms,
    })
}
