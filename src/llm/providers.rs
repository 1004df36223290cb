//! HTTP provider clients: OpenAI Responses API (primary) and a local Ollama
//! chat endpoint (fallback).

use std::time::Duration;

use serde_json::Value;

use super::ChatProvider;
use super::error::ProviderError;

const OPENAI_NAME: &str = "openai";
const OLLAMA_NAME: &str = "ollama";

/// Returned when a provider answers with an empty body.
const NO_OUTPUT: &str = "(no output)";

/// Primary provider: OpenAI Responses API over raw HTTP.
///
/// A disabled provider or a missing API key is reported as a failure at call
/// time so the dispatcher falls through to the fallback tier; neither is a
/// startup error.
pub struct OpenAiProvider {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    model: String,
    enabled: bool,
}

impl OpenAiProvider {
    const DEFAULT_URL: &'static str = "https://api.openai.com/v1/responses";

    /// Creates the provider. `enabled` comes from the `primary_provider`
    /// config selector.
    pub fn new(
        enabled: bool,
        api_key: Option<String>,
        model: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ProviderError::RequestFailed {
                name: OPENAI_NAME,
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            url: Self::DEFAULT_URL.to_string(),
            api_key,
            model: model.into(),
            enabled,
        })
    }

    /// Overrides the endpoint URL (tests against a local stub).
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

impl ChatProvider for OpenAiProvider {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, ProviderError> {
        if !self.enabled {
            return Err(ProviderError::Disabled { name: OPENAI_NAME });
        }

        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingCredentials { name: OPENAI_NAME })?;

        let payload = serde_json::json!({
            "model": self.model,
            "input": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt },
            ],
        });

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed {
                name: OPENAI_NAME,
                message: e.to_string(),
            })?
            .error_for_status()
            .map_err(|e| ProviderError::RequestFailed {
                name: OPENAI_NAME,
                message: e.to_string(),
            })?;

        let data: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse {
                name: OPENAI_NAME,
                message: e.to_string(),
            })?;

        Ok(extract_responses_text(&data))
    }
}

/// Joins every `output_text` content item in a Responses API body.
fn extract_responses_text(data: &Value) -> String {
    let mut out = Vec::new();

    if let Some(items) = data.get("output").and_then(|v| v.as_array()) {
        for item in items {
            if let Some(contents) = item.get("content").and_then(|v| v.as_array()) {
                for c in contents {
                    if c.get("type").and_then(|t| t.as_str()) == Some("output_text") {
                        if let Some(text) = c.get("text").and_then(|t| t.as_str()) {
                            out.push(text);
                        }
                    }
                }
            }
        }
    }

    let joined = out.join("\n");
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        NO_OUTPUT.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Fallback provider: locally reachable Ollama chat endpoint, non-streaming.
pub struct OllamaProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaProvider {
    /// Creates the provider for `base_url` (e.g. `http://127.0.0.1:11434`).
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| ProviderError::RequestFailed {
                name: OLLAMA_NAME,
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
        })
    }
}

impl ChatProvider for OllamaProvider {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, ProviderError> {
        let url = format!("{}/api/chat", self.base_url);
        let payload = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt },
            ],
            "stream": false,
        });

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed {
                name: OLLAMA_NAME,
                message: e.to_string(),
            })?
            .error_for_status()
            .map_err(|e| ProviderError::RequestFailed {
                name: OLLAMA_NAME,
                message: e.to_string(),
            })?;

        let data: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse {
                name: OLLAMA_NAME,
                message: e.to_string(),
            })?;

        let content = data
            .get("message")
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .map(str::trim)
            .unwrap_or("");

        if content.is_empty() {
            Ok(NO_OUTPUT.to_string())
        } else {
            Ok(content.to_string())
        }
    }
}
