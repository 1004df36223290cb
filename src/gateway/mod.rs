//! HTTP gateway (Axum) for the request pipeline.
//!
//! One chat endpoint plus pull-based observability endpoints. This module is
//! primarily used by the `recall` server binary; integration tests drive the
//! same router with mock backends.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;

#[cfg(test)]
mod handler_tests;

use axum::{
    Json, Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::chat_handler;
pub use payload::{ChatRequest, ChatResponse};
pub use state::HandlerState;

use crate::llm::ChatProvider;
use crate::telemetry;
use crate::vectordb::VectorDbClient;

/// Response header reporting the gateway outcome class.
pub const RECALL_STATUS_HEADER: &str = "x-recall-status";

/// Builds the application router over `state`.
pub fn create_router_with_state<C, P, F>(state: HandlerState<C, P, F>) -> Router
where
    C: VectorDbClient + 'static,
    P: ChatProvider + 'static,
    F: ChatProvider + 'static,
{
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/metrics", get(telemetry::metrics_handler))
        .route("/v1/chat", post(chat_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
