//! Error types for session activity tracking.

/// Error type for activity tracker construction.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The supplied configuration cannot be used.
    #[error("Invalid activity config: {0}")]
    InvalidConfig(String),
}

/// Result type for activity tracker operations.
pub type Result<T> = std::result::Result<T, Error>;
