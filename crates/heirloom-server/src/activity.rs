//! Session inactivity gate.
//!
//! Runs after identity resolution. Every request from an identified user
//! refreshes that user's activity timestamp; a request arriving after the
//! idle timeout is rejected with `401` and `sessionExpired: true`, and the
//! user's next request starts a fresh session. Anonymous requests pass
//! through without being tracked.

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use heirloom_session::{Activity, ActivityTracker};

use crate::auth::Identity;
use crate::error::{Result, ServerError};
use crate::state::AppState;

/// Record activity for the caller and reject the request if it expired.
pub fn check_activity(tracker: &ActivityTracker, identity: Option<&Identity>) -> Result<()> {
    let Some(identity) = identity else {
        return Ok(());
    };

    match tracker.check(&identity.user_id) {
        Activity::Allowed => Ok(()),
        Activity::Expired => {
            tracing::info!(user_id = %identity.user_id, "Rejecting request from idle session");
            Err(ServerError::SessionExpired)
        }
    }
}

/// Activity middleware function.
pub async fn activity_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response> {
    check_activity(&state.tracker, request.extensions().get::<Identity>())?;
    Ok(next.run(request).await)
}
