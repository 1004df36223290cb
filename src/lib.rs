//! Recall library crate (used by the server binary and integration tests).
//!
//! A verified semantic-cache gateway for retrieval-augmented chat: requests
//! pass a safety gate and PII redaction, then a scoped semantic cache is
//! consulted; a candidate is only reused after equivalence verification. On a
//! miss the slow path retrieves grounding chunks, augments the prompt,
//! dispatches across two model tiers, and writes the answer back.
//!
//! # Public API Surface
//!
//! - [`Config`], [`ConfigError`] — environment-backed configuration
//! - [`SemanticCache`], [`ScopeKey`], [`CacheMetadata`] — scoped answer cache
//! - [`EquivalenceVerifier`] — pre-reuse verification
//! - [`DocumentRetriever`] — grounding-chunk retrieval
//! - [`Dispatcher`], [`OpenAiProvider`], [`OllamaProvider`] — generation tiers
//! - [`PiiRedactor`], [`HttpPiiDetector`] — best-effort redaction
//! - [`HttpEmbedder`], [`StubEmbedder`] — embedding capability
//! - [`QdrantVectorDb`] — vector store client
//!
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod config;
pub mod embedding;
pub mod gateway;
pub mod hashing;
pub mod llm;
pub mod pii;
pub mod rag;
pub mod retrieval;
pub mod safety;
pub mod scoring;
pub mod telemetry;
pub mod vectordb;

pub use cache::{
    CACHE_COLLECTION_NAME, CacheCandidate, CacheError, CacheLookup, CacheMetadata, ScopeKey,
    SemanticCache,
};
pub use config::{Config, ConfigError, DEFAULT_SYSTEM_PROMPT};
pub use embedding::{Embedder, EmbeddingError, HttpEmbedder, StubEmbedder};
pub use gateway::{
    ChatRequest, ChatResponse, GatewayError, HandlerState, RECALL_STATUS_HEADER,
    create_router_with_state,
};
pub use hashing::{hash_short, hash_to_u64, sys_prompt_hash};
pub use llm::{
    ChatProvider, DispatchError, DispatchOutcome, Dispatcher, OllamaProvider, OpenAiProvider,
    ProviderError, Tier,
};
pub use pii::{HttpPiiDetector, PiiCapability, PiiDetector, PiiError, PiiRedactor, Redaction};
pub use rag::{AugmentedPrompt, Citation, augment};
pub use retrieval::{DOC_COLLECTION_NAME, DocumentRetriever, RetrievedChunk};
pub use safety::{BLOCKED_MESSAGE, is_prompt_injection};
pub use scoring::{
    EquivalenceVerifier, HttpRelevanceScorer, RelevanceScorer, ScorerCapability, ScoringError,
    VerificationOutcome,
};
pub use vectordb::{QdrantVectorDb, VectorDbClient, VectorDbError};

#[cfg(any(test, feature = "mock"))]
pub use vectordb::MockVectorDb;
