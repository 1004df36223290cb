use thiserror::Error;

/// Errors from the PII detection capability.
///
/// These never propagate past [`PiiRedactor`](super::PiiRedactor): a failing
/// detector degrades to a no-op redaction.
#[derive(Debug, Error)]
pub enum PiiError {
    /// HTTP client construction failed.
    #[error("failed to build PII detector client: {message}")]
    ClientBuild { message: String },

    /// The analyzer request failed (network, timeout, non-2xx).
    #[error("PII analyzer request failed: {message}")]
    RequestFailed { message: String },

    /// The analyzer returned an unparseable body.
    #[error("PII analyzer returned an invalid response: {message}")]
    InvalidResponse { message: String },
}
