//! Error types for policy service operations.

use thiserror::Error;

/// Errors that can occur while talking to the policy service.
#[derive(Debug, Error)]
pub enum Error {
    /// The configured endpoint is not a usable base URL.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// The service answered with a non-success status.
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        /// Path that was called.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Response body, if any.
        body: String,
    },

    /// Response parsing failed.
    #[error("failed to parse response: {0}")]
    ParseError(String),

    /// An edit was attempted before any policy was loaded.
    #[error("no policy loaded, refresh first")]
    NotLoaded,

    /// Network error.
    #[error(transparent)]
    Network(#[from] reqwest::Error),

    /// Policy editing error.
    #[error(transparent)]
    Policy(#[from] nopas_policy::Error),
}

/// Result type alias for policy service operations.
pub type Result<T> = std::result::Result<T, Error>;
