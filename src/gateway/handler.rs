//! The chat pipeline handler.
//!
//! Stage order is fixed: safety gate, PII redaction, embedding, scoped cache
//! lookup, equivalence verification, then on a miss the slow path of
//! retrieval, prompt augmentation, two-tier dispatch, and write-back. The
//! safety gate short-circuits before any downstream work; a cache write-back
//! failure degrades the request to uncached rather than failing it.

use axum::{Json, extract::State};
use tracing::{debug, info, instrument, warn};

use crate::cache::{CacheMetadata, ScopeKey};
use crate::llm::{ChatProvider, Tier};
use crate::rag;
use crate::safety;
use crate::telemetry;
use crate::vectordb::VectorDbClient;

use super::error::GatewayError;
use super::payload::{ChatRequest, ChatResponse};
use super::state::HandlerState;

/// Observes end-to-end latency on drop, covering success and error returns.
struct LatencyGuard(std::time::Instant);

impl Drop for LatencyGuard {
    fn drop(&mut self) {
        if let Some(m) = telemetry::metrics() {
            m.chat_latency_seconds.observe(self.0.elapsed().as_secs_f64());
        }
    }
}

/// `POST /v1/chat`.
#[instrument(skip(state, request), fields(tenant_id = %request.tenant_id, user_id = %request.user_id))]
pub async fn chat_handler<C, P, F>(
    State(state): State<HandlerState<C, P, F>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, GatewayError>
where
    C: VectorDbClient,
    P: ChatProvider,
    F: ChatProvider,
{
    let _latency = LatencyGuard(std::time::Instant::now());
    if let Some(m) = telemetry::metrics() {
        m.requests_total.inc();
    }

    // Safety gate runs on the raw text, before any other processing.
    if safety::is_prompt_injection(&request.user_text) {
        info!("Request blocked by safety gate");
        if let Some(m) = telemetry::metrics() {
            m.blocked_total.inc();
        }
        return Ok(Json(ChatResponse::blocked()));
    }

    // Everything downstream sees only the redacted text.
    let redaction = state.redactor.redact(&request.user_text).await;
    let user_text = redaction.text.as_str();

    let query_vector = state.embedder.embed(user_text).await?;

    let scope = ScopeKey::derive(
        &request.tenant_id,
        &request.policy_version,
        &request.system_prompt,
        &request.doc_version,
    );
    let threshold = request.cache_threshold.unwrap_or(state.default_threshold);

    let lookup = state
        .cache
        .lookup(&scope, query_vector.clone(), threshold)
        .await?;

    if let Some(candidate) = &lookup.candidate {
        let outcome = state.verifier.verify(user_text, &candidate.question).await;
        if outcome.accepted {
            debug!(score = outcome.score, "Cache candidate verified, serving from cache");
            if let Some(m) = telemetry::metrics() {
                m.cache_hits_total.inc();
            }
            return Ok(Json(ChatResponse {
                answer: candidate.answer.clone(),
                from_cache: true,
                model_used: Tier::Cache.as_str().to_string(),
                cache_similarity: lookup.similarity,
                pii_redacted: redaction.redacted,
                safety_blocked: false,
                citations: Some(candidate.metadata.citations.clone()),
            }));
        }
        debug!(score = outcome.score, "Cache candidate rejected by verification");
    }
    if let Some(m) = telemetry::metrics() {
        m.cache_misses_total.inc();
    }

    // Slow path: retrieve, augment, dispatch.
    let chunks = state
        .retriever
        .retrieve(
            &request.tenant_id,
            &request.doc_version,
            query_vector.clone(),
            state.retrieve_top_k,
        )
        .await?;

    let prompt = rag::augment(&request.system_prompt, user_text, &chunks);

    if let Some(m) = telemetry::metrics() {
        m.primary_calls_total.inc();
    }
    let outcome = state
        .dispatcher
        .dispatch(&prompt.system_prompt, &prompt.user_prompt)
        .await?;
    if outcome.tier == Tier::Fallback {
        if let Some(m) = telemetry::metrics() {
            m.fallback_calls_total.inc();
        }
    }

    // Write-back is best-effort: a store failure degrades this request to
    // uncached, it does not fail it.
    let metadata = CacheMetadata {
        citations: prompt.citations.clone(),
        pii_redacted: redaction.redacted,
        model_used: outcome.tier.as_str().to_string(),
    };
    if let Err(e) = state
        .cache
        .store(&scope, user_text, &outcome.answer, query_vector, &metadata)
        .await
    {
        warn!(error = %e, "Cache write-back failed, serving uncached");
    }

    Ok(Json(ChatResponse {
        answer: outcome.answer,
        from_cache: false,
        model_used: outcome.tier.as_str().to_string(),
        cache_similarity: lookup.similarity,
        pii_redacted: redaction.redacted,
        safety_blocked: false,
        citations: Some(prompt.citations),
    }))
}
