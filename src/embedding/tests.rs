use super::*;

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[tokio::test]
async fn stub_embedder_is_deterministic() {
    let embedder = StubEmbedder::new(384);
    let a = embedder.embed("how much can I expense for meals?").await.unwrap();
    let b = embedder.embed("how much can I expense for meals?").await.unwrap();
    assert_eq!(a, b);
}

#[tokio::test]
async fn stub_embedder_output_is_normalized() {
    let embedder = StubEmbedder::new(64);
    let v = embedder.embed("reimburse 50 for meals").await.unwrap();
    assert_eq!(v.len(), 64);
    let norm = dot(&v, &v).sqrt();
    assert!((norm - 1.0).abs() < 1e-5, "norm was {norm}");
}

#[tokio::test]
async fn stub_embedder_identical_texts_have_unit_similarity() {
    let embedder = StubEmbedder::new(128);
    let a = embedder.embed("expense policy for travel").await.unwrap();
    let b = embedder.embed("expense policy for travel").await.unwrap();
    assert!((dot(&a, &b) - 1.0).abs() < 1e-5);
}

#[tokio::test]
async fn stub_embedder_different_texts_differ() {
    let embedder = StubEmbedder::new(128);
    let a = embedder.embed("expense policy for travel").await.unwrap();
    let b = embedder.embed("vacation day carryover rules").await.unwrap();
    assert!(dot(&a, &b) < 0.99);
}

#[tokio::test]
async fn stub_embedder_handles_empty_text() {
    let embedder = StubEmbedder::new(16);
    let v = embedder.embed("").await.unwrap();
    let norm = dot(&v, &v).sqrt();
    assert!((norm - 1.0).abs() < 1e-5);
}

#[test]
fn stub_reports_itself() {
    assert!(StubEmbedder::new(8).is_stub());
    assert_eq!(StubEmbedder::new(8).dim(), 8);
}

#[test]
fn normalize_leaves_zero_vector_alone() {
    let mut v = vec![0.0f32; 4];
    normalize(&mut v);
    assert_eq!(v, vec![0.0; 4]);
}
