use std::sync::Arc;

use super::*;
use crate::vectordb::{Payload, VectorPoint, mock::MockVectorDb};

fn chunk_point(id: u64, vector: Vec<f32>, tenant: &str, docv: &str, text: &str) -> VectorPoint {
    let mut payload = Payload::new();
    payload.insert("tenant_id".to_string(), tenant.to_string());
    payload.insert("doc_version".to_string(), docv.to_string());
    payload.insert("doc_id".to_string(), "handbook".to_string());
    payload.insert("chunk_id".to_string(), id.to_string());
    payload.insert("text".to_string(), text.to_string());
    VectorPoint::new(id, vector, payload)
}

async fn retriever_with_chunks() -> DocumentRetriever<MockVectorDb> {
    let db = Arc::new(MockVectorDb::new());
    let retriever = DocumentRetriever::new(db.clone());
    retriever.ensure_collection(2).await.unwrap();

    db.upsert_points(
        DOC_COLLECTION_NAME,
        vec![
            chunk_point(1, vec![1.0, 0.0], "tenantA", "v1", "Meal limit is $75."),
            chunk_point(2, vec![0.9, 0.1], "tenantA", "v1", "Travel must be pre-approved."),
            chunk_point(3, vec![1.0, 0.0], "tenantB", "v1", "Other tenant text."),
            chunk_point(4, vec![1.0, 0.0], "tenantA", "v2", "Newer doc version."),
        ],
    )
    .await
    .unwrap();

    retriever
}

#[tokio::test]
async fn retrieval_is_scoped_to_tenant_and_doc_version() {
    let retriever = retriever_with_chunks().await;

    let chunks = retriever
        .retrieve("tenantA", "v1", vec![1.0, 0.0], 10)
        .await
        .unwrap();

    assert_eq!(chunks.len(), 2);
    assert!(chunks.iter().all(|c| c.doc_id == "handbook"));
    assert!(!chunks.iter().any(|c| c.text.contains("Other tenant")));
    assert!(!chunks.iter().any(|c| c.text.contains("Newer doc")));
}

#[tokio::test]
async fn chunks_come_back_in_descending_similarity() {
    let retriever = retriever_with_chunks().await;

    let chunks = retriever
        .retrieve("tenantA", "v1", vec![1.0, 0.0], 10)
        .await
        .unwrap();

    assert_eq!(chunks[0].chunk_id, "1");
    assert!(chunks[0].similarity >= chunks[1].similarity);
}

#[tokio::test]
async fn top_k_limits_result_count() {
    let retriever = retriever_with_chunks().await;

    let chunks = retriever
        .retrieve("tenantA", "v1", vec![1.0, 0.0], 1)
        .await
        .unwrap();

    assert_eq!(chunks.len(), 1);
}

#[tokio::test]
async fn empty_scope_returns_empty_not_error() {
    let retriever = retriever_with_chunks().await;

    let chunks = retriever
        .retrieve("tenantC", "v1", vec![1.0, 0.0], 10)
        .await
        .unwrap();

    assert!(chunks.is_empty());
}
