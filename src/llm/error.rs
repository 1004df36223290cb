use thiserror::Error;

/// A single provider attempt failure.
///
/// Any of these from the primary tier triggers the fallback attempt; from the
/// fallback tier they are wrapped into [`DispatchError`] and become fatal.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider is disabled by configuration.
    #[error("provider '{name}' is disabled by configuration")]
    Disabled { name: &'static str },

    /// Credentials required by the provider are not configured.
    #[error("provider '{name}' is missing credentials")]
    MissingCredentials { name: &'static str },

    /// The HTTP request failed (network, timeout, non-2xx).
    #[error("provider '{name}' request failed: {message}")]
    RequestFailed { name: &'static str, message: String },

    /// The provider returned an unparseable body.
    #[error("provider '{name}' returned an invalid response: {message}")]
    InvalidResponse { name: &'static str, message: String },
}

/// Dispatch failure: both tiers are down. Fatal for the request.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("all generation tiers failed (primary: {primary}; fallback: {fallback})")]
    BothTiersFailed { primary: String, fallback: String },
}
