use thiserror::Error;

use crate::vectordb::VectorDbError;

/// Errors returned by the semantic cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The underlying vector store failed.
    #[error("cache index operation failed: {0}")]
    Index(#[from] VectorDbError),

    /// Record metadata could not be serialized for storage.
    #[error("failed to serialize cache metadata: {message}")]
    MetadataSerialization { message: String },
}
