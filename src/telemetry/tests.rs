use super::*;

#[test]
fn metrics_register_once_and_are_usable() {
    let m = metrics().expect("metrics should register in a fresh process");

    let before = m.requests_total.get();
    m.requests_total.inc();
    assert_eq!(m.requests_total.get(), before + 1.0);

    m.chat_latency_seconds.observe(0.02);
}

#[tokio::test]
async fn metrics_handler_emits_text_exposition() {
    if let Some(m) = metrics() {
        m.requests_total.inc();
    }

    let response = metrics_handler().await;
    let response = axum::response::IntoResponse::into_response(response);
    assert_eq!(response.status(), axum::http::StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("recall_requests_total"));
}
