//! Error types for policy editing and conversion.

use crate::collection::CollectionError;
use crate::convert::Unsendable;
use thiserror::Error;

/// Errors that can occur during policy operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A collection edit was rejected.
    #[error(transparent)]
    Collection(#[from] CollectionError),

    /// The edited policy cannot be sent.
    #[error("policy cannot be sent: {0}")]
    Unsendable(#[from] Unsendable),

    /// Field key not recognised.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// Parameter provider not recognised.
    #[error("unknown provider '{0}', expected 'nomad' or 'ec2'")]
    UnknownProvider(String),

    /// JSON parsing error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias for policy operations.
pub type Result<T> = std::result::Result<T, Error>;
