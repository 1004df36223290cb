use super::*;
use serial_test::serial;
use std::env;
use std::net::IpAddr;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_recall_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var("RECALL_PORT");
        env::remove_var("RECALL_BIND_ADDR");
        env::remove_var("RECALL_QDRANT_URL");
        env::remove_var("RECALL_VECTOR_DIM");
        env::remove_var("RECALL_CACHE_THRESHOLD");
        env::remove_var("RECALL_RETRIEVE_TOP_K");
        env::remove_var("RECALL_EMBEDDING_URL");
        env::remove_var("RECALL_PII_URL");
        env::remove_var("RECALL_SCORER_URL");
        env::remove_var("RECALL_PRIMARY_PROVIDER");
        env::remove_var("OPENAI_API_KEY");
        env::remove_var("RECALL_OPENAI_MODEL");
        env::remove_var("RECALL_OLLAMA_BASE_URL");
        env::remove_var("RECALL_OLLAMA_MODEL");
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.port, 8080);
    assert_eq!(
        config.bind_addr,
        IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1))
    );
    assert_eq!(config.qdrant_url, "http://localhost:6334");
    assert_eq!(config.vector_dim, 384);
    assert_eq!(config.cache_threshold, 0.95);
    assert_eq!(config.retrieve_top_k, 4);
    assert!(config.embedding_url.is_none());
    assert_eq!(config.primary_provider, "none");
    assert_eq!(config.ollama_base_url, "http://127.0.0.1:11434");
}

#[test]
fn test_socket_addr() {
    let config = Config::default();
    assert_eq!(config.socket_addr(), "127.0.0.1:8080");
}

#[test]
#[serial]
fn test_from_env_defaults() {
    clear_recall_env();
    let config = Config::from_env().expect("config should load");
    assert_eq!(config.port, 8080);
    assert_eq!(config.cache_threshold, 0.95);
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_recall_env();
    let config = with_env_vars(
        &[
            ("RECALL_PORT", "3000"),
            ("RECALL_CACHE_THRESHOLD", "0.9"),
            ("RECALL_RETRIEVE_TOP_K", "8"),
            ("RECALL_PRIMARY_PROVIDER", "openai"),
            ("OPENAI_API_KEY", "sk-test"),
        ],
        || Config::from_env().expect("config should load"),
    );

    assert_eq!(config.port, 3000);
    assert_eq!(config.cache_threshold, 0.9);
    assert_eq!(config.retrieve_top_k, 8);
    assert_eq!(config.primary_provider, "openai");
    assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
}

#[test]
#[serial]
fn test_invalid_port_rejected() {
    clear_recall_env();
    let result = with_env_vars(&[("RECALL_PORT", "0")], Config::from_env);
    assert!(matches!(result, Err(ConfigError::InvalidPort { .. })));

    let result = with_env_vars(&[("RECALL_PORT", "not-a-port")], Config::from_env);
    assert!(matches!(result, Err(ConfigError::PortParseError { .. })));
}

#[test]
#[serial]
fn test_empty_optional_urls_are_none() {
    clear_recall_env();
    let config = with_env_vars(&[("RECALL_EMBEDDING_URL", "  ")], || {
        Config::from_env().expect("config should load")
    });
    assert!(config.embedding_url.is_none());
}

#[test]
fn test_validate_rejects_bad_threshold() {
    let config = Config {
        cache_threshold: 1.5,
        ..Config::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidThreshold { .. })
    ));
}

#[test]
fn test_validate_rejects_zero_top_k() {
    let config = Config {
        retrieve_top_k: 0,
        ..Config::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidTopK { .. })
    ));
}

#[test]
fn test_validate_accepts_defaults() {
    assert!(Config::default().validate().is_ok());
}
