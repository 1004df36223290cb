//! In-memory detector doubles for tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{PiiDetector, PiiEntity, PiiError};

/// Detector that reports fixed spans and counts invocations.
#[derive(Default)]
pub struct MockPiiDetector {
    entities: Vec<PiiEntity>,
    calls: AtomicUsize,
}

impl MockPiiDetector {
    /// Creates a detector that reports nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a detector that reports `entities` for every call.
    pub fn with_entities(entities: Vec<PiiEntity>) -> Self {
        Self {
            entities,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `analyze` calls observed.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PiiDetector for MockPiiDetector {
    async fn analyze(&self, _text: &str) -> Result<Vec<PiiEntity>, PiiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.entities.clone())
    }
}

/// Detector that always errors, for exercising the no-op degradation path.
#[derive(Default)]
pub struct FailingPiiDetector;

#[async_trait]
impl PiiDetector for FailingPiiDetector {
    async fn analyze(&self, _text: &str) -> Result<Vec<PiiEntity>, PiiError> {
        Err(PiiError::RequestFailed {
            message: "connection refused".to_string(),
        })
    }
}
