//! Embedding capability.
//!
//! The embedding function is an external contract: text in, fixed-dimension
//! L2-normalized vector out. Two implementations:
//!
//! - [`HttpEmbedder`] — calls an OpenAI-compatible embeddings endpoint.
//! - [`StubEmbedder`] — deterministic hashed bag-of-words vectors, used when
//!   no endpoint is configured. Stub mode still produces stable, normalized
//!   vectors so the cache and retrieval paths behave consistently; it is
//!   announced with a startup warning.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::EmbeddingError;

use async_trait::async_trait;
use serde::Deserialize;

use crate::hashing::hash_to_u64;

/// Text-to-vector contract. Implementations must return L2-normalized vectors
/// of exactly `dim()` elements.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embeds `text` into a normalized vector.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Vector dimensionality, fixed per deployment.
    fn dim(&self) -> usize;

    /// Returns `true` for the stub implementation.
    fn is_stub(&self) -> bool {
        false
    }
}

/// L2-normalizes `vector` in place. A zero vector is left untouched.
pub fn normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        for v in vector.iter_mut() {
            *v /= norm;
        }
    }
}

/// Client for an OpenAI-compatible `/embeddings` endpoint.
pub struct HttpEmbedder {
    client: reqwest::Client,
    url: String,
    dim: usize,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingsDatum>,
}

#[derive(Deserialize)]
struct EmbeddingsDatum {
    embedding: Vec<f32>,
}

impl HttpEmbedder {
    /// Creates an embedder client for `url` expecting `dim`-element vectors.
    pub fn new(url: impl Into<String>, dim: usize) -> Result<Self, EmbeddingError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| EmbeddingError::ClientBuild {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            url: url.into(),
            dim,
        })
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let body = serde_json::json!({ "input": [text] });

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| EmbeddingError::RequestFailed {
                message: e.to_string(),
            })?
            .error_for_status()
            .map_err(|e| EmbeddingError::RequestFailed {
                message: e.to_string(),
            })?;

        let parsed: EmbeddingsResponse =
            response
                .json()
                .await
                .map_err(|e| EmbeddingError::InvalidResponse {
                    message: e.to_string(),
                })?;

        let mut vector = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| EmbeddingError::InvalidResponse {
                message: "empty data array".to_string(),
            })?;

        if vector.len() != self.dim {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dim,
                actual: vector.len(),
            });
        }

        normalize(&mut vector);
        Ok(vector)
    }

    fn dim(&self) -> usize {
        self.dim
    }
}

/// Deterministic hashed bag-of-words embedder.
///
/// Each lower-cased whitespace token is hashed into a bucket; the resulting
/// count vector is L2-normalized. Identical texts always produce identical
/// vectors, which is what the round-trip and scope-isolation behavior of the
/// cache relies on.
#[derive(Debug, Clone)]
pub struct StubEmbedder {
    dim: usize,
}

impl StubEmbedder {
    /// Creates a stub embedder with `dim`-element output.
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

#[async_trait]
impl Embedder for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vector = vec![0.0f32; self.dim];

        for token in text.to_lowercase().split_whitespace() {
            let h = hash_to_u64(token.as_bytes());
            let bucket = (h % self.dim as u64) as usize;
            // Second hash bit decides the sign, spreading tokens over the
            // full sphere instead of the positive orthant.
            let sign = if (h >> 32) & 1 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        if vector.iter().all(|v| *v == 0.0) {
            vector[0] = 1.0;
        }

        normalize(&mut vector);
        Ok(vector)
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn is_stub(&self) -> bool {
        true
    }
}
