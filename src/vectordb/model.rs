use std::collections::HashMap;

use qdrant_client::qdrant::ScoredPoint;
use qdrant_client::qdrant::point_id::PointIdOptions;

/// String-valued payload attached to every point.
///
/// All scope and content fields in this system are strings (tenant id, policy
/// version, hashes, question/answer text, serialized metadata), which keeps
/// the tag-filter semantics exact-match keyword comparisons.
pub type Payload = HashMap<String, String>;

/// A point to upsert: deterministic id, embedding, string payload.
#[derive(Debug, Clone)]
pub struct VectorPoint {
    pub id: u64,
    pub vector: Vec<f32>,
    pub payload: Payload,
}

impl VectorPoint {
    pub fn new(id: u64, vector: Vec<f32>, payload: Payload) -> Self {
        Self {
            id,
            vector,
            payload,
        }
    }
}

/// A scored search hit with its payload.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub id: u64,
    /// Cosine similarity as reported by the index (1.0 = identical).
    pub score: f32,
    pub payload: Payload,
}

impl SearchResult {
    /// Converts a Qdrant scored point, dropping non-string payload values.
    pub fn from_scored_point(point: ScoredPoint) -> Option<Self> {
        let id = match point.id.and_then(|pid| pid.point_id_options) {
            Some(PointIdOptions::Num(n)) => n,
            _ => return None,
        };

        let payload = point
            .payload
            .into_iter()
            .filter_map(|(k, v)| v.as_str().map(|s| (k, s.to_string())))
            .collect();

        Some(SearchResult {
            id,
            score: point.score,
            payload,
        })
    }

    /// Returns a payload field, or `""` when absent.
    pub fn field(&self, key: &str) -> &str {
        self.payload.get(key).map(String::as_str).unwrap_or("")
    }
}
