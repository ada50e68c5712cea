//! Server configuration.

use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};

use heirloom_session::ActivityConfig;

/// Default port for the HTTP server.
pub const DEFAULT_PORT: u16 = 8080;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to.
    pub bind_address: SocketAddr,

    /// Bearer tokens mapped to the user id they authenticate.
    pub auth_tokens: HashMap<String, String>,

    /// Accept `X-User-Id` as the caller identity when no bearer token is sent.
    pub trust_user_header: bool,

    /// Enable request logging.
    pub request_logging: bool,

    /// Idle timeout and sweep interval for session activity tracking.
    pub activity: ActivityConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            auth_tokens: HashMap::new(),
            trust_user_header: false,
            request_logging: true,
            activity: ActivityConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Create a new server config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bind address.
    pub fn with_bind_address(mut self, addr: SocketAddr) -> Self {
        self.bind_address = addr;
        self
    }

    /// Register a bearer token for a user.
    pub fn with_token(mut self, token: impl Into<String>, user_id: impl Into<String>) -> Self {
        self.auth_tokens.insert(token.into(), user_id.into());
        self
    }

    /// Replace all bearer tokens.
    pub fn with_tokens(mut self, tokens: HashMap<String, String>) -> Self {
        self.auth_tokens = tokens;
        self
    }

    /// Enable or disable the trusted user id header.
    pub fn with_trust_user_header(mut self, enabled: bool) -> Self {
        self.trust_user_header = enabled;
        self
    }

    /// Enable or disable request logging.
    pub fn with_request_logging(mut self, enabled: bool) -> Self {
        self.request_logging = enabled;
        self
    }

    /// Set the activity tracking configuration.
    pub fn with_activity(mut self, activity: ActivityConfig) -> Self {
        self.activity = activity;
        self
    }
}
