//! Error types for the seeker crate.

use thiserror::Error;

/// Errors that can occur when building queries.
#[derive(Debug, Error)]
pub enum SeekerError {
    /// Invalid regular expression pattern.
    #[error("invalid regex pattern: {0}")]
    InvalidRegex(#[from] regex::Error),
}

/// Result type for seeker operations.
pub type Result<T> = std::result::Result<T, SeekerError>;
