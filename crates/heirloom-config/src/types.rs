//! Configuration types mapping to the TOML schema.
//!
//! Top-level config:
//! ```toml
//! [server]                 # bind address, request logging
//! [session]                # idle timeout and sweep interval
//! [auth]                   # identity resolution
//! [auth.tokens]            # bearer token -> user id
//! ```

use std::collections::BTreeMap;

use heirloom_session::{ActivityConfig, DEFAULT_IDLE_TIMEOUT_MS, DEFAULT_SWEEP_INTERVAL_MS};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Default port for the HTTP server.
pub const DEFAULT_PORT: u16 = 8080;

/// Default bind address for the HTTP server.
pub const DEFAULT_BIND: &str = "127.0.0.1";

// ─────────────────────────────────────────────────────────────────────────────
// Top-level Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration structure.
///
/// All sections are optional so that partial configs (e.g., project-local
/// overrides) can be loaded and merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeirloomConfig {
    /// Server configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,

    /// Session activity tracking configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionConfig>,

    /// Identity resolution configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,
}

impl HeirloomConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Merge another config on top of this one (other takes priority).
    ///
    /// Sections are replaced wholesale, except auth tokens which are unioned
    /// with the overriding layer winning on duplicate tokens.
    pub fn merge(&mut self, other: HeirloomConfig) {
        if other.server.is_some() {
            self.server = other.server;
        }

        if other.session.is_some() {
            self.session = other.session;
        }

        if let Some(other_auth) = other.auth {
            match self.auth.as_mut() {
                Some(auth) => {
                    auth.trust_user_header = other_auth.trust_user_header;
                    auth.tokens.extend(other_auth.tokens);
                }
                None => self.auth = Some(other_auth),
            }
        }
    }

    /// Server section, or defaults when absent.
    pub fn server_or_default(&self) -> ServerConfig {
        self.server.clone().unwrap_or_default()
    }

    /// Session section, or defaults when absent.
    pub fn session_or_default(&self) -> SessionConfig {
        self.session.clone().unwrap_or_default()
    }

    /// Auth section, or defaults when absent.
    pub fn auth_or_default(&self) -> AuthConfig {
        self.auth.clone().unwrap_or_default()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Server Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Server configuration.
///
/// ```toml
/// [server]
/// bind = "127.0.0.1"
/// port = 8080
/// request_logging = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port to listen on.
    pub port: u16,
    /// Address to bind to.
    pub bind: String,
    /// Enable request logging.
    pub request_logging: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
            request_logging: true,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Session Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Session activity tracking configuration.
///
/// ```toml
/// [session]
/// idle_timeout_ms = 600000
/// sweep_interval_ms = 60000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Idle time after which a user's next request is rejected.
    pub idle_timeout_ms: u64,
    /// Interval between background sweeps of idle sessions.
    pub sweep_interval_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_ms: DEFAULT_IDLE_TIMEOUT_MS,
            sweep_interval_ms: DEFAULT_SWEEP_INTERVAL_MS,
        }
    }
}

impl SessionConfig {
    /// Convert into the tracker's runtime configuration.
    pub fn to_activity_config(&self) -> Result<ActivityConfig> {
        let config = ActivityConfig::new()
            .with_idle_timeout_ms(self.idle_timeout_ms)
            .with_sweep_interval_ms(self.sweep_interval_ms);
        config
            .validate()
            .map_err(|e| ConfigError::InvalidValue {
                field: "session.sweep_interval_ms".to_string(),
                reason: e.to_string(),
            })?;
        Ok(config)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Auth Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Identity resolution configuration.
///
/// ```toml
/// [auth]
/// trust_user_header = false
///
/// [auth.tokens]
/// "long-random-token" = "user-1"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Accept the `X-User-Id` header as the caller's identity.
    /// Only safe behind a proxy that sets it.
    pub trust_user_header: bool,
    /// Bearer tokens and the user id each one authenticates.
    pub tokens: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config() {
        let config = HeirloomConfig::from_toml("").unwrap();
        assert_eq!(config, HeirloomConfig::default());
        assert_eq!(config.server_or_default().port, DEFAULT_PORT);
        assert_eq!(config.session_or_default().idle_timeout_ms, 600_000);
        assert!(config.auth_or_default().tokens.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let config = HeirloomConfig::from_toml(
            r#"
[server]
bind = "0.0.0.0"
port = 9000
request_logging = false

[session]
idle_timeout_ms = 300000
sweep_interval_ms = 15000

[auth]
trust_user_header = true

[auth.tokens]
"token-a" = "alice"
"token-b" = "bob"
"#,
        )
        .unwrap();

        let server = config.server.as_ref().unwrap();
        assert_eq!(server.bind, "0.0.0.0");
        assert_eq!(server.port, 9000);
        assert!(!server.request_logging);

        let session = config.session.as_ref().unwrap();
        assert_eq!(session.idle_timeout_ms, 300_000);
        assert_eq!(session.sweep_interval_ms, 15_000);

        let auth = config.auth.as_ref().unwrap();
        assert!(auth.trust_user_header);
        assert_eq!(auth.tokens.get("token-a"), Some(&"alice".to_string()));
        assert_eq!(auth.tokens.len(), 2);
    }

    #[test]
    fn test_partial_session_section_uses_defaults() {
        let config = HeirloomConfig::from_toml(
            r#"
[session]
idle_timeout_ms = 1000
"#,
        )
        .unwrap();

        let session = config.session.unwrap();
        assert_eq!(session.idle_timeout_ms, 1_000);
        assert_eq!(session.sweep_interval_ms, DEFAULT_SWEEP_INTERVAL_MS);
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = HeirloomConfig::new();
        config.session = Some(SessionConfig {
            idle_timeout_ms: 42_000,
            sweep_interval_ms: 7_000,
        });

        let text = config.to_toml().unwrap();
        let parsed = HeirloomConfig::from_toml(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_merge_overrides_sections() {
        let mut base = HeirloomConfig::from_toml(
            r#"
[server]
port = 8000

[session]
idle_timeout_ms = 1000
"#,
        )
        .unwrap();

        let overlay = HeirloomConfig::from_toml(
            r#"
[session]
idle_timeout_ms = 2000
"#,
        )
        .unwrap();

        base.merge(overlay);
        assert_eq!(base.server.as_ref().unwrap().port, 8000);
        assert_eq!(base.session.as_ref().unwrap().idle_timeout_ms, 2_000);
    }

    #[test]
    fn test_merge_unions_tokens() {
        let mut base = HeirloomConfig::from_toml(
            r#"
[auth.tokens]
"shared" = "alice"
"base-only" = "bob"
"#,
        )
        .unwrap();

        let overlay = HeirloomConfig::from_toml(
            r#"
[auth.tokens]
"shared" = "carol"
"#,
        )
        .unwrap();

        base.merge(overlay);
        let tokens = &base.auth.as_ref().unwrap().tokens;
        assert_eq!(tokens.get("shared"), Some(&"carol".to_string()));
        assert_eq!(tokens.get("base-only"), Some(&"bob".to_string()));
    }

    #[test]
    fn test_to_activity_config() {
        let session = SessionConfig {
            idle_timeout_ms: 5_000,
            sweep_interval_ms: 500,
        };
        let activity = session.to_activity_config().unwrap();
        assert_eq!(activity.idle_timeout_ms, 5_000);
        assert_eq!(activity.sweep_interval_ms, 500);
    }

    #[test]
    fn test_to_activity_config_rejects_zero_interval() {
        let session = SessionConfig {
            idle_timeout_ms: 5_000,
            sweep_interval_ms: 0,
        };
        let err = session.to_activity_config().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
