//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `RECALL_*` environment
//! variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::net::IpAddr;

/// Default Qdrant URL used when `RECALL_QDRANT_URL` is not set.
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

/// Default system prompt applied when a request does not carry one.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Gateway configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `RECALL_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Qdrant endpoint URL. Default: `http://localhost:6334`.
    pub qdrant_url: String,

    /// Embedding vector dimensionality, fixed per deployment. Default: `384`.
    pub vector_dim: usize,

    /// Minimum cosine similarity for a cache candidate. Default: `0.95`.
    pub cache_threshold: f32,

    /// Number of document chunks retrieved on the slow path. Default: `4`.
    pub retrieve_top_k: usize,

    /// Embedding service endpoint. When unset the embedder runs in stub mode.
    pub embedding_url: Option<String>,

    /// PII analyzer endpoint. When unset, redaction degrades to a no-op.
    pub pii_url: Option<String>,

    /// Relevance scorer endpoint. When unset, verification falls back to the
    /// lexical overlap heuristic.
    pub scorer_url: Option<String>,

    /// Primary provider selector: `"openai"` or `"none"`. Default: `"none"`.
    pub primary_provider: String,

    /// API key for the primary provider. Missing key counts as a primary
    /// failure at dispatch time, not a startup error.
    pub openai_api_key: Option<String>,

    /// Primary model name. Default: `gpt-4o-mini`.
    pub openai_model: String,

    /// Ollama base URL for the local fallback. Default: `http://127.0.0.1:11434`.
    pub ollama_base_url: String,

    /// Ollama model name. Default: `llama3`.
    pub ollama_model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            vector_dim: 384,
            cache_threshold: 0.95,
            retrieve_top_k: 4,
            embedding_url: None,
            pii_url: None,
            scorer_url: None,
            primary_provider: "none".to_string(),
            openai_api_key: None,
            openai_model: "gpt-4o-mini".to_string(),
            ollama_base_url: "http://127.0.0.1:11434".to_string(),
            ollama_model: "llama3".to_string(),
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "RECALL_PORT";
    const ENV_BIND_ADDR: &'static str = "RECALL_BIND_ADDR";
    const ENV_QDRANT_URL: &'static str = "RECALL_QDRANT_URL";
    const ENV_VECTOR_DIM: &'static str = "RECALL_VECTOR_DIM";
    const ENV_CACHE_THRESHOLD: &'static str = "RECALL_CACHE_THRESHOLD";
    const ENV_RETRIEVE_TOP_K: &'static str = "RECALL_RETRIEVE_TOP_K";
    const ENV_EMBEDDING_URL: &'static str = "RECALL_EMBEDDING_URL";
    const ENV_PII_URL: &'static str = "RECALL_PII_URL";
    const ENV_SCORER_URL: &'static str = "RECALL_SCORER_URL";
    const ENV_PRIMARY_PROVIDER: &'static str = "RECALL_PRIMARY_PROVIDER";
    const ENV_OPENAI_API_KEY: &'static str = "OPENAI_API_KEY";
    const ENV_OPENAI_MODEL: &'static str = "RECALL_OPENAI_MODEL";
    const ENV_OLLAMA_BASE_URL: &'static str = "RECALL_OLLAMA_BASE_URL";
    const ENV_OLLAMA_MODEL: &'static str = "RECALL_OLLAMA_MODEL";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let qdrant_url = Self::parse_string_from_env(Self::ENV_QDRANT_URL, defaults.qdrant_url);
        let vector_dim = Self::parse_usize_from_env(Self::ENV_VECTOR_DIM, defaults.vector_dim);
        let cache_threshold = Self::parse_threshold_from_env(defaults.cache_threshold)?;
        let retrieve_top_k =
            Self::parse_usize_from_env(Self::ENV_RETRIEVE_TOP_K, defaults.retrieve_top_k);
        let embedding_url = Self::parse_optional_string_from_env(Self::ENV_EMBEDDING_URL);
        let pii_url = Self::parse_optional_string_from_env(Self::ENV_PII_URL);
        let scorer_url = Self::parse_optional_string_from_env(Self::ENV_SCORER_URL);
        let primary_provider =
            Self::parse_string_from_env(Self::ENV_PRIMARY_PROVIDER, defaults.primary_provider);
        let openai_api_key = Self::parse_optional_string_from_env(Self::ENV_OPENAI_API_KEY);
        let openai_model =
            Self::parse_string_from_env(Self::ENV_OPENAI_MODEL, defaults.openai_model);
        let ollama_base_url =
            Self::parse_string_from_env(Self::ENV_OLLAMA_BASE_URL, defaults.ollama_base_url);
        let ollama_model =
            Self::parse_string_from_env(Self::ENV_OLLAMA_MODEL, defaults.ollama_model);

        Ok(Self {
            port,
            bind_addr,
            qdrant_url,
            vector_dim,
            cache_threshold,
            retrieve_top_k,
            embedding_url,
            pii_url,
            scorer_url,
            primary_provider,
            openai_api_key,
            openai_model,
            ollama_base_url,
            ollama_model,
        })
    }

    /// Validates basic invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.cache_threshold) {
            return Err(ConfigError::InvalidThreshold {
                value: self.cache_threshold,
            });
        }

        if self.vector_dim == 0 {
            return Err(ConfigError::InvalidVectorDim {
                value: self.vector_dim,
            });
        }

        if self.retrieve_top_k == 0 {
            return Err(ConfigError::InvalidTopK {
                value: self.retrieve_top_k,
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_threshold_from_env(default: f32) -> Result<f32, ConfigError> {
        match env::var(Self::ENV_CACHE_THRESHOLD) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::ThresholdParseError { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_usize_from_env(var_name: &str, default: usize) -> usize {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}
