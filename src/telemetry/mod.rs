//! Prometheus metrics.
//!
//! Counters for every pipeline decision point plus an end-to-end latency
//! histogram, exposed on a pull-based `/metrics` endpoint.

#[cfg(test)]
mod tests;

use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use once_cell::sync::Lazy;
use prometheus::{
    Counter, Encoder, Histogram, TextEncoder, register_counter, register_histogram,
};
use tracing::error;

/// Request latency buckets (seconds): sub-millisecond cache hits through
/// multi-second two-tier model dispatches.
const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5, 5.0, 10.0, 30.0,
];

/// Global metrics instance, registered once at first use.
static METRICS: Lazy<Result<GatewayMetrics, prometheus::Error>> = Lazy::new(GatewayMetrics::new);

/// Returns the registered metrics, or `None` if registration failed.
pub fn metrics() -> Option<&'static GatewayMetrics> {
    match &*METRICS {
        Ok(m) => Some(m),
        Err(e) => {
            error!(error = %e, "Metrics registration failed, counters disabled");
            None
        }
    }
}

/// Container for all gateway metrics.
#[derive(Clone)]
pub struct GatewayMetrics {
    /// Total chat requests received.
    pub requests_total: Counter,
    /// Verified cache hits.
    pub cache_hits_total: Counter,
    /// Cache misses (including verification rejections).
    pub cache_misses_total: Counter,
    /// Primary provider attempts.
    pub primary_calls_total: Counter,
    /// Fallback provider attempts.
    pub fallback_calls_total: Counter,
    /// Requests blocked by the safety gate.
    pub blocked_total: Counter,
    /// End-to-end chat latency.
    pub chat_latency_seconds: Histogram,
}

impl GatewayMetrics {
    fn new() -> Result<Self, prometheus::Error> {
        Ok(Self {
            requests_total: register_counter!(
                "recall_requests_total",
                "Total chat requests received"
            )?,
            cache_hits_total: register_counter!(
                "recall_cache_hits_total",
                "Verified semantic cache hits"
            )?,
            cache_misses_total: register_counter!(
                "recall_cache_misses_total",
                "Cache misses, including verification rejections"
            )?,
            primary_calls_total: register_counter!(
                "recall_primary_calls_total",
                "Primary model call attempts"
            )?,
            fallback_calls_total: register_counter!(
                "recall_fallback_calls_total",
                "Fallback model call attempts"
            )?,
            blocked_total: register_counter!(
                "recall_blocked_total",
                "Requests blocked by the safety gate"
            )?,
            chat_latency_seconds: register_histogram!(
                "recall_chat_latency_seconds",
                "End-to-end chat request latency in seconds",
                LATENCY_BUCKETS.to_vec()
            )?,
        })
    }
}

/// `GET /metrics` — Prometheus text exposition.
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, encoder.format_type().to_string())],
            buffer,
        ),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain".to_string())],
                format!("failed to encode metrics: {e}").into_bytes(),
            )
        }
    }
}
