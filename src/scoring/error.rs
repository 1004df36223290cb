use thiserror::Error;

/// Errors from the relevance-scoring capability.
///
/// A failing scorer never rejects a request by itself: the verifier degrades
/// to the lexical heuristic.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// HTTP client construction failed.
    #[error("failed to build relevance scorer client: {message}")]
    ClientBuild { message: String },

    /// The scoring request failed (network, timeout, non-2xx).
    #[error("relevance scorer request failed: {message}")]
    RequestFailed { message: String },

    /// The scorer returned an unparseable body.
    #[error("relevance scorer returned an invalid response: {message}")]
    InvalidResponse { message: String },
}
