//! Store error definitions.

use std::time::Duration;
use thiserror::Error;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors raised by the document store client.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Connection string could not be parsed.
    #[error("invalid store URI: {0}")]
    InvalidUri(#[from] url::ParseError),

    /// Connection string names a backend this build does not provide.
    #[error("unsupported store URI scheme '{0}'")]
    UnsupportedScheme(String),

    /// Connection string is well-formed but unusable.
    #[error("unusable store URI '{uri}': {reason}")]
    UnusableUri { uri: String, reason: String },

    /// Snapshot read or write failed.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot contents could not be (de)serialized.
    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// MongoDB driver failure (connection, query or decoding).
    #[error("mongodb error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// A stored document could not be mapped to a request record.
    #[error("invalid stored document: {0}")]
    InvalidDocument(String),

    /// A detached commit task panicked or was cancelled.
    #[error("store commit task failed: {0}")]
    Commit(#[from] tokio::task::JoinError),

    /// Call did not complete within the configured bound.
    #[error("store call timed out after {0:?}")]
    Timeout(Duration),
}
