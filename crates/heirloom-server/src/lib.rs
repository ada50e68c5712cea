//! HTTP server for Heirloom.
//!
//! This crate puts the session activity tracker in front of an axum API.
//!
//! # Features
//!
//! - Bearer-token (or trusted header) identity resolution
//! - Inactivity gate answering idle users with `401` and `sessionExpired: true`
//! - Background sweeper started and stopped with the server
//! - Request logging
//! - OpenAPI document and Swagger UI
//!
//! # Example
//!
//! ```ignore
//! use heirloom_server::{Server, ServerConfig};
//!
//! let config = ServerConfig::new()
//!     .with_token("long-random-token", "user-1")
//!     .with_bind_address("127.0.0.1:8080".parse()?);
//!
//! let server = Server::new(config)?;
//! server.run_with_shutdown(async { tokio::signal::ctrl_c().await.ok(); }).await?;
//! ```

pub mod activity;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod routes;
pub mod state;

pub use activity::{activity_middleware, check_activity};
pub use auth::{AuthError, AuthIdentity, Identity, USER_ID_HEADER, identity_middleware};
pub use config::ServerConfig;
pub use error::{ErrorResponse, Result, SESSION_EXPIRED_MESSAGE, ServerError};
pub use logging::request_logging_middleware;
pub use state::AppState;

use std::future::Future;
use std::net::SocketAddr;

use axum::{Router, middleware};
use heirloom_session::ActivitySweeper;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// The Heirloom HTTP server.
pub struct Server {
    /// Application state.
    state: AppState,
}

impl Server {
    /// Create a new server with the given configuration.
    pub fn new(config: ServerConfig) -> Result<Self> {
        Ok(Self {
            state: AppState::new(config)?,
        })
    }

    /// Get the application state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Build the router with all routes and middleware.
    pub fn router(&self) -> Router {
        Router::new()
            // Health routes (never identified, never tracked)
            .merge(routes::health_routes())
            .merge(routes::swagger_ui())
            .nest("/api/v1", self.api_routes())
            .layer(middleware::from_fn_with_state(
                self.state.clone(),
                logging::request_logging_middleware,
            ))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// API routes (v1).
    ///
    /// Identity resolution runs first, then the activity gate.
    fn api_routes(&self) -> Router<AppState> {
        use axum::routing::get;

        Router::new()
            .route("/session", get(routes::get_session_handler))
            .route("/session/stats", get(routes::session_stats_handler))
            .layer(middleware::from_fn_with_state(
                self.state.clone(),
                activity::activity_middleware,
            ))
            .layer(middleware::from_fn_with_state(
                self.state.clone(),
                auth::identity_middleware,
            ))
    }

    /// Run the server on the configured address until the process exits.
    pub async fn run(self) -> Result<()> {
        let addr = self.state.config.bind_address;
        self.run_on(addr).await
    }

    /// Run the server on a specific address (useful for testing).
    pub async fn run_on(self, addr: SocketAddr) -> Result<()> {
        let listener = bind(addr).await?;
        self.serve(listener, std::future::pending()).await
    }

    /// Run the server on the configured address until `shutdown` resolves.
    ///
    /// The sweeper is stopped once in-flight requests have drained.
    pub async fn run_with_shutdown(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<()> {
        let listener = bind(self.state.config.bind_address).await?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<()> {
        let router = self.router();
        let sweeper = ActivitySweeper::start(self.state.tracker.clone());

        if let Ok(addr) = listener.local_addr() {
            info!(
                addr = %addr,
                idle_timeout_ms = self.state.config.activity.idle_timeout_ms,
                sweep_interval_ms = self.state.config.activity.sweep_interval_ms,
                "Starting server"
            );
        }

        let result = axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Internal(format!("Server error: {}", e)));

        sweeper.stop().await;
        info!("Server stopped");

        result
    }
}

async fn bind(addr: SocketAddr) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Internal(format!("Failed to bind {}: {}", addr, e)))
}
