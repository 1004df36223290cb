//! Scoped semantic answer cache.
//!
//! Cache reuse is bounded by the [`ScopeKey`]: a record is only ever a
//! candidate for a request whose four scope fields match exactly. Proximity in
//! embedding space never crosses that boundary — the scope fields are applied
//! as an exact-match pre-filter on the KNN search, not re-checked afterwards.
//!
//! A similarity pass alone does not authorize reuse; the caller must also run
//! the [`EquivalenceVerifier`](crate::scoring::EquivalenceVerifier) against
//! the candidate's stored question.

pub mod error;
pub mod semantic;
pub mod types;


pub use error::CacheError;
pub use semantic::SemanticCache;
pub use types::{CacheCandidate, CacheLookup, CacheMetadata, ScopeKey};

/// Qdrant collection holding cached question/answer records.
pub const CACHE_COLLECTION_NAME: &str = "qa_cache";

/// Candidates retrieved per lookup; only the closest is considered for reuse.
pub const CACHE_SEARCH_TOP_K: u64 = 5;
