//! Cache error types.

use thiserror::Error;

/// Errors that can occur when reading or writing client storage.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Failed to serialize or deserialize a stored value.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The storage backend rejected the operation.
    #[error("storage backend error: {0}")]
    Backend(String),
}
