use std::error::Error;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by storage backends regardless of the underlying database.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be reached or answered with an unexpected failure.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// Human-readable summary of the failure.
        message: String,
        /// Backend-specific cause.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The document changed between the read that produced the entity and the
    /// write that tried to persist it. Retryable: re-fetch and recompute.
    #[error("write conflict on `{id}`: document changed since it was read")]
    Conflict {
        /// Identifier of the contended document.
        id: String,
    },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Construct a write-conflict error for the given document id.
    pub fn conflict(id: impl Into<String>) -> Self {
        StorageError::Conflict { id: id.into() }
    }

    /// Whether retrying the whole read-modify-write cycle can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StorageError::Conflict { .. })
    }
}
