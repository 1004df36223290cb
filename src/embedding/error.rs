use thiserror::Error;

/// Errors from the embedding capability.
///
/// Embedding sits on the critical path for both cache lookup and document
/// retrieval, so these are fatal for the current request.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// HTTP client construction failed.
    #[error("failed to build embedding client: {message}")]
    ClientBuild { message: String },

    /// The embeddings request failed (network, timeout, non-2xx).
    #[error("embedding request failed: {message}")]
    RequestFailed { message: String },

    /// The endpoint returned an unparseable body.
    #[error("embedding service returned an invalid response: {message}")]
    InvalidResponse { message: String },

    /// The returned vector did not match the configured dimensionality.
    #[error("invalid embedding dimension: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}
