//! Grounding-document retrieval.
//!
//! Chunks are scoped by `(tenant_id, doc_version)` only — grounding documents
//! are independent of prompt framing, so they are shared across policies and
//! system prompts. The store is written by an external ingestion process and
//! read-only here.

#[cfg(test)]
mod tests;

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::vectordb::{VectorDbClient, VectorDbError};

/// Qdrant collection holding document chunks.
pub const DOC_COLLECTION_NAME: &str = "doc_chunks";

/// A retrieved chunk annotated with its source identifiers and similarity.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedChunk {
    pub doc_id: String,
    pub chunk_id: String,
    pub text: String,
    /// Cosine similarity to the query (1.0 = identical).
    pub similarity: f32,
}

/// Scoped KNN retriever over the document-chunk store.
pub struct DocumentRetriever<C: VectorDbClient> {
    client: Arc<C>,
    collection: String,
}

impl<C: VectorDbClient> DocumentRetriever<C> {
    /// Creates a retriever over `client` using the default collection name.
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            collection: DOC_COLLECTION_NAME.to_string(),
        }
    }

    /// Overrides the collection name (tests).
    pub fn with_collection(client: Arc<C>, collection: impl Into<String>) -> Self {
        Self {
            client,
            collection: collection.into(),
        }
    }

    /// Ensures the backing collection exists.
    pub async fn ensure_collection(&self, vector_size: u64) -> Result<(), VectorDbError> {
        self.client
            .ensure_collection(&self.collection, vector_size)
            .await
    }

    /// Returns up to `top_k` chunks for `(tenant_id, doc_version)`, in
    /// descending similarity order. An empty result is valid, not an error.
    #[instrument(skip(self, query_vector), fields(tenant_id = tenant_id))]
    pub async fn retrieve(
        &self,
        tenant_id: &str,
        doc_version: &str,
        query_vector: Vec<f32>,
        top_k: usize,
    ) -> Result<Vec<RetrievedChunk>, VectorDbError> {
        let filters = vec![
            ("tenant_id".to_string(), tenant_id.to_string()),
            ("doc_version".to_string(), doc_version.to_string()),
        ];

        let results = self
            .client
            .search(&self.collection, query_vector, top_k as u64, filters)
            .await?;

        let chunks: Vec<RetrievedChunk> = results
            .into_iter()
            .map(|r| RetrievedChunk {
                doc_id: r.field("doc_id").to_string(),
                chunk_id: r.field("chunk_id").to_string(),
                text: r.field("text").to_string(),
                similarity: r.score,
            })
            .collect();

        debug!(chunks = chunks.len(), "Document retrieval complete");
        Ok(chunks)
    }
}
