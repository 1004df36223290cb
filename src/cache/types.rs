use serde::{Deserialize, Serialize};

use crate::hashing::{hash_short, hash_to_u64};
use crate::rag::Citation;

/// The reuse boundary for cached answers.
///
/// Two requests may share a cached answer only if all four fields match
/// exactly. `sys_hash` is a short deterministic hash of the verbatim system
/// prompt, so editing the prompt invalidates sharing without a version bump.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeKey {
    pub tenant_id: String,
    pub policy_version: String,
    pub sys_hash: String,
    pub doc_version: String,
}

impl ScopeKey {
    /// Builds the scope for a request, hashing the system prompt.
    pub fn derive(
        tenant_id: &str,
        policy_version: &str,
        system_prompt: &str,
        doc_version: &str,
    ) -> Self {
        Self {
            tenant_id: tenant_id.to_string(),
            policy_version: policy_version.to_string(),
            sys_hash: hash_short(system_prompt),
            doc_version: doc_version.to_string(),
        }
    }

    /// Deterministic record key: `qa:{tenant}:{policy}:{sys}:{docv}:{hash(question)}`.
    pub fn record_key(&self, question: &str) -> String {
        format!(
            "qa:{}:{}:{}:{}:{}",
            self.tenant_id,
            self.policy_version,
            self.sys_hash,
            self.doc_version,
            hash_short(question)
        )
    }

    /// Point id for the record: truncated hash of [`Self::record_key`].
    ///
    /// The same (scope, question) always maps to the same id, which is what
    /// makes `store` an idempotent upsert and concurrent duplicate writes
    /// last-write-wins safe.
    pub fn point_id(&self, question: &str) -> u64 {
        hash_to_u64(self.record_key(question).as_bytes())
    }

    /// Exact-match tag filters applied to every cache search.
    pub fn filters(&self) -> Vec<(String, String)> {
        vec![
            ("tenant_id".to_string(), self.tenant_id.clone()),
            ("policy_version".to_string(), self.policy_version.clone()),
            ("sys_hash".to_string(), self.sys_hash.clone()),
            ("doc_version".to_string(), self.doc_version.clone()),
        ]
    }
}

/// Metadata stored alongside a cached answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheMetadata {
    /// Grounding citations from the slow path that produced the answer.
    #[serde(default)]
    pub citations: Vec<Citation>,
    /// Whether the stored question was PII-redacted.
    #[serde(default)]
    pub pii_redacted: bool,
    /// Which dispatch tier produced the answer (`primary` | `fallback`).
    #[serde(default)]
    pub model_used: String,
}

/// A cache record surfaced by lookup.
#[derive(Debug, Clone)]
pub struct CacheCandidate {
    /// The stored (redacted) question text, input to verification.
    pub question: String,
    /// The stored answer.
    pub answer: String,
    /// Stored metadata.
    pub metadata: CacheMetadata,
}

/// Outcome of a scoped lookup.
///
/// `similarity` is reported even on a below-threshold miss, for response
/// diagnostics.
#[derive(Debug, Clone, Default)]
pub struct CacheLookup {
    /// The closest candidate, present only when similarity ≥ threshold.
    pub candidate: Option<CacheCandidate>,
    /// Best similarity achieved, if any candidate matched the scope filter.
    pub similarity: Option<f32>,
}
