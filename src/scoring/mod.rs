//! Equivalence verification for cache candidates.
//!
//! Similarity is a recall mechanism; verification is the precision guard.
//! A candidate that passed the similarity threshold is only served after this
//! module accepts the (query, cached question) pair:
//!
//! 1. Differing numeric-literal token sets reject immediately with score 0 —
//!    embedding proximity cannot tell "reimburse $50" from "reimburse $500".
//! 2. With a relevance scorer configured, accept at score ≥ 0.7.
//! 3. Otherwise a lexical Jaccard overlap heuristic, accept at ≥ 0.6.

pub mod error;
pub mod types;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use error::ScoringError;
pub use types::VerificationOutcome;

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

/// Minimum relevance-scorer score for acceptance.
pub const SCORER_ACCEPT_THRESHOLD: f32 = 0.7;

/// Minimum lexical Jaccard overlap for acceptance in fallback mode.
pub const LEXICAL_ACCEPT_THRESHOLD: f32 = 0.6;

static NUMERIC_TOKENS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d+(?:\.\d+)?\b").expect("numeric token pattern is valid"));

/// External pairwise relevance-scoring contract (cross-encoder style).
#[async_trait]
pub trait RelevanceScorer: Send + Sync {
    /// Scores the relevance of `candidate` to `query`; higher is closer.
    async fn score(&self, query: &str, candidate: &str) -> Result<f32, ScoringError>;
}

/// Typed availability of the scoring capability.
#[derive(Clone)]
pub enum ScorerCapability {
    /// A relevance scorer is configured.
    Scorer(Arc<dyn RelevanceScorer>),
    /// No scorer; verification uses the lexical heuristic.
    Unavailable,
}

/// Two-stage equivalence check applied before any cache reuse.
#[derive(Clone)]
pub struct EquivalenceVerifier {
    capability: ScorerCapability,
}

impl EquivalenceVerifier {
    /// Creates a verifier over the given capability.
    pub fn new(capability: ScorerCapability) -> Self {
        Self { capability }
    }

    /// Returns `true` when a relevance scorer is configured.
    pub fn has_scorer(&self) -> bool {
        matches!(self.capability, ScorerCapability::Scorer(_))
    }

    /// Decides whether `cached_question` is equivalent to `query`.
    pub async fn verify(&self, query: &str, cached_question: &str) -> VerificationOutcome {
        if numeric_tokens(query) != numeric_tokens(cached_question) {
            debug!("Numeric token mismatch, rejecting candidate");
            return VerificationOutcome::rejected();
        }

        if let ScorerCapability::Scorer(scorer) = &self.capability {
            match scorer.score(query, cached_question).await {
                Ok(score) => {
                    return VerificationOutcome {
                        accepted: score >= SCORER_ACCEPT_THRESHOLD,
                        score,
                    };
                }
                Err(e) => {
                    warn!(error = %e, "Relevance scorer failed, using lexical fallback");
                }
            }
        }

        let score = lexical_overlap(query, cached_question);
        VerificationOutcome {
            accepted: score >= LEXICAL_ACCEPT_THRESHOLD,
            score,
        }
    }
}

/// Extracts the set of integer/decimal literal tokens in `text`.
fn numeric_tokens(text: &str) -> HashSet<&str> {
    NUMERIC_TOKENS.find_iter(text).map(|m| m.as_str()).collect()
}

/// Jaccard similarity over lower-cased whitespace-tokenized word sets.
fn lexical_overlap(a: &str, b: &str) -> f32 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let set_a: HashSet<&str> = a.split_whitespace().collect();
    let set_b: HashSet<&str> = b.split_whitespace().collect();

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();

    intersection as f32 / union.max(1) as f32
}

/// HTTP client for a reranker-style relevance endpoint.
pub struct HttpRelevanceScorer {
    client: reqwest::Client,
    url: String,
}

impl HttpRelevanceScorer {
    /// Creates a scorer client for `url`.
    pub fn new(url: impl Into<String>) -> Result<Self, ScoringError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(5))
            .build()
            .map_err(|e| ScoringError::ClientBuild {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl RelevanceScorer for HttpRelevanceScorer {
    async fn score(&self, query: &str, candidate: &str) -> Result<f32, ScoringError> {
        let body = serde_json::json!({ "query": query, "documents": [candidate] });

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ScoringError::RequestFailed {
                message: e.to_string(),
            })?
            .error_for_status()
            .map_err(|e| ScoringError::RequestFailed {
                message: e.to_string(),
            })?;

        let json: serde_json::Value =
            response
                .json()
                .await
                .map_err(|e| ScoringError::InvalidResponse {
                    message: e.to_string(),
                })?;

        parse_score(&json)
    }
}

/// Extracts the first relevance score from a reranker response, tolerating
/// both `results` and `data` envelopes.
fn parse_score(json: &serde_json::Value) -> Result<f32, ScoringError> {
    json.get("results")
        .or_else(|| json.get("data"))
        .and_then(|v| v.as_array())
        .and_then(|items| items.first())
        .and_then(|item| {
            item.get("relevance_score")
                .or_else(|| item.get("score"))
                .and_then(|v| v.as_f64())
        })
        .map(|s| s as f32)
        .ok_or_else(|| ScoringError::InvalidResponse {
            message: "missing relevance score".to_string(),
        })
}
