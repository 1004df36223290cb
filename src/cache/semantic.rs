use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, instrument, warn};

use crate::vectordb::{Payload, VectorDbClient, VectorPoint};

use super::error::CacheError;
use super::types::{CacheCandidate, CacheLookup, CacheMetadata, ScopeKey};
use super::{CACHE_COLLECTION_NAME, CACHE_SEARCH_TOP_K};

/// Scoped nearest-neighbor cache over question/answer records.
///
/// Generic over the vector store so tests can run against the in-memory mock.
pub struct SemanticCache<C: VectorDbClient> {
    client: Arc<C>,
    collection: String,
}

impl<C: VectorDbClient> SemanticCache<C> {
    /// Creates a cache over `client` using the default collection name.
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            collection: CACHE_COLLECTION_NAME.to_string(),
        }
    }

    /// Overrides the collection name (tests).
    pub fn with_collection(client: Arc<C>, collection: impl Into<String>) -> Self {
        Self {
            client,
            collection: collection.into(),
        }
    }

    /// Collection name in use.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Ensures the backing collection exists.
    pub async fn ensure_collection(&self, vector_size: u64) -> Result<(), CacheError> {
        self.client
            .ensure_collection(&self.collection, vector_size)
            .await?;
        Ok(())
    }

    /// Scoped lookup: KNN restricted to exact scope-field equality, then a
    /// similarity threshold on the closest candidate.
    ///
    /// Returns the candidate only when its similarity is at or above
    /// `threshold`; the best similarity is reported either way.
    #[instrument(skip(self, query_vector), fields(tenant_id = %scope.tenant_id))]
    pub async fn lookup(
        &self,
        scope: &ScopeKey,
        query_vector: Vec<f32>,
        threshold: f32,
    ) -> Result<CacheLookup, CacheError> {
        let results = self
            .client
            .search(
                &self.collection,
                query_vector,
                CACHE_SEARCH_TOP_K,
                scope.filters(),
            )
            .await?;

        let Some(best) = results.into_iter().next() else {
            debug!("No cache candidates in scope");
            return Ok(CacheLookup::default());
        };

        let similarity = best.score;

        if similarity < threshold {
            debug!(similarity, threshold, "Best candidate below threshold");
            return Ok(CacheLookup {
                candidate: None,
                similarity: Some(similarity),
            });
        }

        let metadata = match serde_json::from_str::<CacheMetadata>(best.field("meta")) {
            Ok(meta) => meta,
            Err(e) => {
                warn!(error = %e, "Unparseable cache metadata, using defaults");
                CacheMetadata::default()
            }
        };

        debug!(similarity, "Cache candidate above threshold");

        Ok(CacheLookup {
            candidate: Some(CacheCandidate {
                question: best.field("question").to_string(),
                answer: best.field("answer").to_string(),
                metadata,
            }),
            similarity: Some(similarity),
        })
    }

    /// Idempotent write-through of a verified slow-path answer.
    ///
    /// The point id is derived from (scope, question), so storing the same
    /// question under the same scope overwrites the prior record with the
    /// latest metadata winning.
    #[instrument(skip(self, question, answer, vector, metadata), fields(tenant_id = %scope.tenant_id))]
    pub async fn store(
        &self,
        scope: &ScopeKey,
        question: &str,
        answer: &str,
        vector: Vec<f32>,
        metadata: &CacheMetadata,
    ) -> Result<(), CacheError> {
        let meta_json = serde_json::to_string(metadata).map_err(|e| {
            CacheError::MetadataSerialization {
                message: e.to_string(),
            }
        })?;

        let mut payload = Payload::new();
        payload.insert("tenant_id".to_string(), scope.tenant_id.clone());
        payload.insert("policy_version".to_string(), scope.policy_version.clone());
        payload.insert("sys_hash".to_string(), scope.sys_hash.clone());
        payload.insert("doc_version".to_string(), scope.doc_version.clone());
        payload.insert("question".to_string(), question.to_string());
        payload.insert("answer".to_string(), answer.to_string());
        payload.insert("meta".to_string(), meta_json);
        payload.insert("created_at".to_string(), Utc::now().to_rfc3339());

        let point = VectorPoint::new(scope.point_id(question), vector, payload);

        self.client
            .upsert_points(&self.collection, vec![point])
            .await?;

        debug!("Cache record stored");
        Ok(())
    }
}
