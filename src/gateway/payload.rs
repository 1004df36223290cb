//! Wire payloads for the chat endpoint.

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_SYSTEM_PROMPT;
use crate::rag::Citation;

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_version() -> String {
    "v1".to_string()
}

/// A chat request. `system_prompt`, `policy_version`, and `doc_version` have
/// defaults; `cache_threshold` optionally overrides the configured similarity
/// threshold for this request only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub tenant_id: String,
    pub user_id: String,
    pub user_text: String,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    #[serde(default = "default_version")]
    pub policy_version: String,
    #[serde(default = "default_version")]
    pub doc_version: String,
    #[serde(default)]
    pub cache_threshold: Option<f32>,
}

/// A chat response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
    pub from_cache: bool,
    /// `cache` | `primary` | `fallback` | `blocked`.
    pub model_used: String,
    /// Best cache similarity achieved, reported on both hits and misses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_similarity: Option<f32>,
    #[serde(default)]
    pub pii_redacted: bool,
    #[serde(default)]
    pub safety_blocked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citations: Option<Vec<Citation>>,
}

impl ChatResponse {
    /// The fixed safety-gate response.
    pub fn blocked() -> Self {
        Self {
            answer: crate::safety::BLOCKED_MESSAGE.to_string(),
            from_cache: false,
            model_used: crate::llm::Tier::Blocked.as_str().to_string(),
            cache_similarity: None,
            pii_redacted: false,
            safety_blocked: true,
            citations: None,
        }
    }
}
