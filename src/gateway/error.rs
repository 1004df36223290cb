use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::cache::CacheError;
use crate::embedding::EmbeddingError;
use crate::llm::DispatchError;
use crate::vectordb::VectorDbError;

use super::RECALL_STATUS_HEADER;

/// Fatal request failures. Recoverable conditions (PII detector down, primary
/// provider down, cache write failure) never surface here — they are absorbed
/// at their component boundaries.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("cache lookup failed: {0}")]
    CacheLookup(#[from] CacheError),

    #[error("document retrieval failed: {0}")]
    Retrieval(#[from] VectorDbError),

    #[error("generation failed: {0}")]
    Dispatch(#[from] DispatchError),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        // Internal detail goes to the log; the caller gets a generic class.
        tracing::error!(error = %self, "Request failed");

        let (status, message, recall_status) = match &self {
            GatewayError::Embedding(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "embedding failed",
                "embedding_error",
            ),
            GatewayError::CacheLookup(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "cache store unavailable",
                "cache_error",
            ),
            GatewayError::Retrieval(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "document store unavailable",
                "retrieval_error",
            ),
            GatewayError::Dispatch(_) => (
                StatusCode::BAD_GATEWAY,
                "generation providers unavailable",
                "provider_error",
            ),
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            RECALL_STATUS_HEADER,
            HeaderValue::from_str(recall_status).unwrap_or(HeaderValue::from_static("error")),
        );

        let body = Json(ErrorResponse {
            error: message.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
