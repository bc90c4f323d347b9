//! Errors raised by errwrap itself
//!
//! Chain operations never fail; an absent result is `None`. Only loading a
//! rendering configuration can go wrong.

use thiserror::Error;

/// Configuration loading failures
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The input was not a valid format record
    #[error("invalid format configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field held a value the renderer cannot use
    #[error("invalid format field `{field}`: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

/// Result type alias using [`ConfigError`]
pub type Result<T> = std::result::Result<T, ConfigError>;
