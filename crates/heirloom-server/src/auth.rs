//! Identity resolution middleware.
//!
//! Resolves the caller to a user id from a bearer token (or, when enabled, a
//! trusted `X-User-Id` header) and injects an [`Identity`] into request
//! extensions. Requests carrying neither are passed on anonymously; handlers
//! that need a user extract [`AuthIdentity`], which rejects anonymous calls.
//!
//! # Security
//!
//! Token comparison uses constant-time comparison to prevent timing attacks.

use axum::{
    body::Body,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::error::ServerError;
use crate::state::AppState;

/// Header carrying a proxy-asserted user id.
pub const USER_ID_HEADER: &str = "X-User-Id";

// ─────────────────────────────────────────────────────────────────────────────
// Identity
// ─────────────────────────────────────────────────────────────────────────────

/// Authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque, stable identifier of the authenticated principal.
    pub user_id: String,
}

impl Identity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Auth Error
// ─────────────────────────────────────────────────────────────────────────────

/// Authentication error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No identity could be resolved for a route that needs one.
    #[error("Missing authorization token")]
    MissingToken,
    /// Invalid authorization header format.
    #[error("Invalid authorization format")]
    InvalidFormat,
    /// Token validation failed.
    #[error("Invalid token")]
    InvalidToken,
}

impl From<AuthError> for ServerError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidFormat => ServerError::BadRequest(e.to_string()),
            AuthError::MissingToken | AuthError::InvalidToken => {
                ServerError::Unauthorized(e.to_string())
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ServerError::from(self).into_response()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Security Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Compare two strings in constant time.
fn constant_time_eq(a: &str, b: &str) -> bool {
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    if a_bytes.len() == b_bytes.len() {
        a_bytes.ct_eq(b_bytes).into()
    } else {
        // Keep timing consistent when lengths differ.
        let _ = a_bytes.ct_eq(a_bytes);
        false
    }
}

/// Find the user a bearer token belongs to.
///
/// Every configured token is compared so the match position does not leak.
fn lookup_token<'a>(
    token: &str,
    tokens: impl IntoIterator<Item = (&'a String, &'a String)>,
) -> Option<&'a str> {
    let mut found = None;
    for (candidate, user_id) in tokens {
        if constant_time_eq(token, candidate) {
            found = Some(user_id.as_str());
        }
    }
    found
}

// ─────────────────────────────────────────────────────────────────────────────
// Middleware
// ─────────────────────────────────────────────────────────────────────────────

/// Identity middleware function.
///
/// Injects an [`Identity`] into request extensions when one can be resolved.
pub async fn identity_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    if let Some(identity) = resolve_identity(&request, &state)? {
        request.extensions_mut().insert(identity);
    }

    Ok(next.run(request).await)
}

/// Resolve the caller's identity, if any.
fn resolve_identity(request: &Request<Body>, state: &AppState) -> Result<Option<Identity>, AuthError> {
    let config = state.config();

    if let Some(auth_header) = request.headers().get(AUTHORIZATION) {
        let auth_str = auth_header.to_str().map_err(|_| AuthError::InvalidFormat)?;
        let token = auth_str
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidFormat)?;

        let user_id = lookup_token(token, &config.auth_tokens).ok_or(AuthError::InvalidToken)?;
        // A token mapped to an empty user id is accepted but anonymous.
        return Ok((!user_id.is_empty()).then(|| Identity::new(user_id)));
    }

    if config.trust_user_header
        && let Some(header) = request.headers().get(USER_ID_HEADER)
    {
        let user_id = header.to_str().map_err(|_| AuthError::InvalidFormat)?.trim();
        if !user_id.is_empty() {
            return Ok(Some(Identity::new(user_id)));
        }
    }

    Ok(None)
}

// ─────────────────────────────────────────────────────────────────────────────
// Extractor
// ─────────────────────────────────────────────────────────────────────────────

/// Extractor for handlers that require an authenticated caller.
///
/// ```ignore
/// async fn my_handler(AuthIdentity(identity): AuthIdentity) -> String {
///     format!("Hello, {}", identity.user_id)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthIdentity(pub Identity);

impl<S> FromRequestParts<S> for AuthIdentity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(AuthIdentity)
            .ok_or(AuthError::MissingToken)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
