//! Liveness endpoint.

use axum::{Json, Router, extract::State, routing::get};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Always `"ok"` when the server answers.
    pub status: String,
    /// Crate version of the running server.
    pub version: String,
    /// Users with a live or not-yet-swept activity entry.
    pub tracked_sessions: usize,
}

/// GET /health - Liveness probe. Never identified, never tracked.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server is up", body = HealthResponse),
    ),
    tag = "health"
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        tracked_sessions: state.tracker.table().len(),
    })
}

/// Routes mounted outside `/api/v1`.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
