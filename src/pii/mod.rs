//! Best-effort PII redaction.
//!
//! Entity detection is an external capability injected at construction. When
//! no detector is configured, or the configured detector errors, redaction
//! degrades to a no-op with `redacted = false` — this module must never cause
//! a pipeline failure.
//!
//! The redacted text (not the raw text) feeds every downstream step:
//! embedding, cache key derivation, and storage. PII therefore never reaches
//! the vector store.

pub mod error;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(test)]
mod tests;

pub use error::PiiError;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Placeholder substituted for every detected entity span.
pub const PII_PLACEHOLDER: &str = "<PII>";

/// A single detected entity, in character offsets into the original text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PiiEntity {
    /// Detector-assigned entity type (e.g. `EMAIL_ADDRESS`).
    pub entity_type: String,
    /// Start offset (inclusive), in characters.
    pub start: usize,
    /// End offset (exclusive), in characters.
    pub end: usize,
    /// Detector confidence in `[0, 1]`.
    pub score: f32,
}

/// Result of a redaction pass.
#[derive(Debug, Clone)]
pub struct Redaction {
    /// The sanitized text (identical to the input when nothing was detected).
    pub text: String,
    /// Whether any substitution happened.
    pub redacted: bool,
    /// Detected entities, retained for audit.
    pub entities: Vec<PiiEntity>,
}

impl Redaction {
    fn passthrough(text: &str) -> Self {
        Self {
            text: text.to_string(),
            redacted: false,
            entities: Vec::new(),
        }
    }
}

/// External entity-detection contract.
#[async_trait]
pub trait PiiDetector: Send + Sync {
    /// Analyzes `text` and returns detected entity spans.
    async fn analyze(&self, text: &str) -> Result<Vec<PiiEntity>, PiiError>;
}

/// Typed availability of the detection capability.
///
/// Callers branch on this variant, never on a caught failure from a missing
/// dependency.
#[derive(Clone)]
pub enum PiiCapability {
    /// A detector is configured.
    Detector(Arc<dyn PiiDetector>),
    /// No detector configured; redaction is a no-op.
    Unavailable,
}

/// Redacts detected PII spans, degrading to a no-op on any detector problem.
#[derive(Clone)]
pub struct PiiRedactor {
    capability: PiiCapability,
}

impl PiiRedactor {
    /// Creates a redactor over the given capability.
    pub fn new(capability: PiiCapability) -> Self {
        Self { capability }
    }

    /// Returns `true` when a detector is configured.
    pub fn is_available(&self) -> bool {
        matches!(self.capability, PiiCapability::Detector(_))
    }

    /// Redacts `text`. Never fails: detector errors are logged and the input
    /// is returned unchanged with `redacted = false`.
    pub async fn redact(&self, text: &str) -> Redaction {
        let detector = match &self.capability {
            PiiCapability::Detector(d) => d,
            PiiCapability::Unavailable => return Redaction::passthrough(text),
        };

        let entities = match detector.analyze(text).await {
            Ok(entities) => entities,
            Err(e) => {
                warn!(error = %e, "PII detector failed, passing text through unredacted");
                return Redaction::passthrough(text);
            }
        };

        if entities.is_empty() {
            return Redaction::passthrough(text);
        }

        let redacted_text = substitute_spans(text, &entities);
        debug!(entities = entities.len(), "Redacted PII spans");

        Redaction {
            text: redacted_text,
            redacted: true,
            entities,
        }
    }
}

/// Replaces each entity span with [`PII_PLACEHOLDER`].
///
/// Spans are applied right-to-left so earlier offsets stay valid; overlapping
/// spans collapse into a single placeholder.
fn substitute_spans(text: &str, entities: &[PiiEntity]) -> String {
    let chars: Vec<char> = text.chars().collect();

    let mut spans: Vec<(usize, usize)> = entities
        .iter()
        .map(|e| (e.start.min(chars.len()), e.end.min(chars.len())))
        .filter(|(start, end)| start < end)
        .collect();
    spans.sort();

    // Merge overlapping/adjacent spans.
    let mut merged: Vec<(usize, usize)> = Vec::with_capacity(spans.len());
    for (start, end) in spans {
        match merged.last_mut() {
            Some((_, last_end)) if start <= *last_end => *last_end = (*last_end).max(end),
            _ => merged.push((start, end)),
        }
    }

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for (start, end) in merged {
        out.extend(&chars[cursor..start]);
        out.push_str(PII_PLACEHOLDER);
        cursor = end;
    }
    out.extend(&chars[cursor..]);
    out
}

/// HTTP client for a Presidio-style analyzer endpoint.
pub struct HttpPiiDetector {
    client: reqwest::Client,
    url: String,
}

impl HttpPiiDetector {
    /// Creates a detector client for `url`.
    pub fn new(url: impl Into<String>) -> Result<Self, PiiError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(5))
            .build()
            .map_err(|e| PiiError::ClientBuild {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl PiiDetector for HttpPiiDetector {
    async fn analyze(&self, text: &str) -> Result<Vec<PiiEntity>, PiiError> {
        let body = serde_json::json!({ "text": text, "language": "en" });

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| PiiError::RequestFailed {
                message: e.to_string(),
            })?
            .error_for_status()
            .map_err(|e| PiiError::RequestFailed {
                message: e.to_string(),
            })?;

        response
            .json::<Vec<PiiEntity>>()
            .await
            .map_err(|e| PiiError::InvalidResponse {
                message: e.to_string(),
            })
    }
}
