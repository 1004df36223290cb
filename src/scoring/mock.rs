//! Scorer doubles for tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{RelevanceScorer, ScoringError};

/// Scorer returning a fixed score, counting invocations.
pub struct MockRelevanceScorer {
    score: f32,
    calls: AtomicUsize,
}

impl MockRelevanceScorer {
    /// Always returns `score`.
    pub fn fixed(score: f32) -> Self {
        Self {
            score,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `score` calls observed.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RelevanceScorer for MockRelevanceScorer {
    async fn score(&self, _query: &str, _candidate: &str) -> Result<f32, ScoringError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.score)
    }
}

/// Scorer that always errors, for exercising the lexical fallback.
#[derive(Default)]
pub struct FailingRelevanceScorer;

#[async_trait]
impl RelevanceScorer for FailingRelevanceScorer {
    async fn score(&self, _query: &str, _candidate: &str) -> Result<f32, ScoringError> {
        Err(ScoringError::RequestFailed {
            message: "connection refused".to_string(),
        })
    }
}
