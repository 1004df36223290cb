//! Generation providers and two-tier dispatch.
//!
//! Dispatch is sequential and non-racing: one primary attempt, then on any
//! primary failure (disabled provider, missing credentials, network, non-2xx,
//! timeout) exactly one fallback attempt. There is no third tier and no retry
//! loop — at most two provider calls per request.

pub mod error;
pub mod providers;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use error::{DispatchError, ProviderError};
pub use providers::{OllamaProvider, OpenAiProvider};

use tracing::{debug, instrument, warn};

/// Which tier produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Served from the verified semantic cache.
    Cache,
    /// Primary generation provider.
    Primary,
    /// Local fallback provider.
    Fallback,
    /// Request was blocked by the safety gate; no answer was generated.
    Blocked,
}

impl Tier {
    /// Wire label for the `model_used` response field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Cache => "cache",
            Tier::Primary => "primary",
            Tier::Fallback => "fallback",
            Tier::Blocked => "blocked",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chat-style generation contract: (system message, user message) → text.
pub trait ChatProvider: Send + Sync {
    /// Generates a completion for the prompt pair.
    fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> impl std::future::Future<Output = Result<String, ProviderError>> + Send;
}

impl<T: ChatProvider> ChatProvider for std::sync::Arc<T> {
    fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> impl std::future::Future<Output = Result<String, ProviderError>> + Send {
        (**self).complete(system_prompt, user_prompt)
    }
}

/// A generated answer tagged with the tier that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOutcome {
    pub answer: String,
    /// Always [`Tier::Primary`] or [`Tier::Fallback`].
    pub tier: Tier,
}

/// Two-tier sequential dispatcher.
pub struct Dispatcher<P: ChatProvider, F: ChatProvider> {
    primary: P,
    fallback: F,
}

impl<P: ChatProvider, F: ChatProvider> Dispatcher<P, F> {
    /// Creates a dispatcher over the two providers.
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }

    /// Attempts primary, then fallback. A fallback failure is fatal.
    #[instrument(skip_all)]
    pub async fn dispatch(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<DispatchOutcome, DispatchError> {
        let primary_error = match self.primary.complete(system_prompt, user_prompt).await {
            Ok(answer) => {
                debug!("Primary provider answered");
                return Ok(DispatchOutcome {
                    answer,
                    tier: Tier::Primary,
                });
            }
            Err(e) => {
                warn!(error = %e, "Primary provider failed, dispatching to fallback");
                e
            }
        };

        match self.fallback.complete(system_prompt, user_prompt).await {
            Ok(answer) => Ok(DispatchOutcome {
                answer,
                tier: Tier::Fallback,
            }),
            Err(fallback_error) => Err(DispatchError::BothTiersFailed {
                primary: primary_error.to_string(),
                fallback: fallback_error.to_string(),
            }),
        }
    }
}
