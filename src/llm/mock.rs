//! Provider doubles for tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use super::ChatProvider;
use super::error::ProviderError;

/// Provider returning a fixed answer, counting invocations.
pub struct MockProvider {
    answer: String,
    calls: AtomicUsize,
}

impl MockProvider {
    /// Always answers with `answer`.
    pub fn answering(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `complete` calls observed.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ChatProvider for MockProvider {
    async fn complete(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
    ) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.answer.clone())
    }
}

/// Provider that fails every call, counting invocations.
pub struct FailingProvider {
    calls: AtomicUsize,
}

impl FailingProvider {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `complete` calls observed.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for FailingProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatProvider for FailingProvider {
    async fn complete(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
    ) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ProviderError::RequestFailed {
            name: "mock",
            message: "simulated outage".to_string(),
        })
    }
}
