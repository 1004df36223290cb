//! Configuration error types.

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Port value is outside valid range (1-65535).
    #[error("invalid port '{value}': must be between 1 and 65535")]
    InvalidPort { value: String },

    /// Port string could not be parsed as a number.
    #[error("failed to parse port '{value}': {source}")]
    PortParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Bind address string could not be parsed.
    #[error("failed to parse bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// Cache threshold string could not be parsed as a float.
    #[error("failed to parse cache threshold '{value}': {source}")]
    ThresholdParseError {
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    /// Cache threshold is outside `[0.0, 1.0]`.
    #[error("invalid cache threshold {value}: must be within [0.0, 1.0]")]
    InvalidThreshold { value: f32 },

    /// Vector dimensionality must be non-zero.
    #[error("invalid vector dimension {value}: must be greater than zero")]
    InvalidVectorDim { value: usize },

    /// Retrieval top-k must be non-zero.
    #[error("invalid retrieve top-k {value}: must be greater than zero")]
    InvalidTopK { value: usize },
}
