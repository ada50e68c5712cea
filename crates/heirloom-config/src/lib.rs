//! Configuration system for the Heirloom session service.
//!
//! Provides TOML-based configuration with:
//! - `[server]` bind address and request logging
//! - `[session]` idle timeout and sweep interval for activity tracking
//! - `[auth]` bearer tokens mapped to user identifiers
//! - Config file layering (XDG user config + project-local overrides)

pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{
    ConfigSource, LoadedConfig, load_config, load_config_file, load_config_with_options, save_config,
    xdg_config_dir, xdg_config_path,
};
pub use error::{ConfigError, Result};
pub use types::*;
