//! Recall HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use recall::cache::{CACHE_COLLECTION_NAME, SemanticCache};
use recall::config::Config;
use recall::embedding::{Embedder, HttpEmbedder, StubEmbedder};
use recall::gateway::{HandlerState, create_router_with_state};
use recall::llm::{Dispatcher, OllamaProvider, OpenAiProvider};
use recall::pii::{HttpPiiDetector, PiiCapability, PiiRedactor};
use recall::retrieval::{DOC_COLLECTION_NAME, DocumentRetriever};
use recall::scoring::{EquivalenceVerifier, HttpRelevanceScorer, ScorerCapability};
use recall::vectordb::QdrantVectorDb;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        qdrant_url = %config.qdrant_url,
        "Recall starting"
    );

    let vector_db = Arc::new(QdrantVectorDb::new(&config.qdrant_url).await?);

    let cache = Arc::new(SemanticCache::new(vector_db.clone()));
    cache.ensure_collection(config.vector_dim as u64).await?;
    tracing::info!(collection = CACHE_COLLECTION_NAME, "Cache collection ready");

    let retriever = Arc::new(DocumentRetriever::new(vector_db.clone()));
    retriever.ensure_collection(config.vector_dim as u64).await?;
    tracing::info!(collection = DOC_COLLECTION_NAME, "Document collection ready");

    let embedder: Arc<dyn Embedder> = match &config.embedding_url {
        Some(url) => Arc::new(HttpEmbedder::new(url.clone(), config.vector_dim)?),
        None => {
            tracing::warn!(
                "No RECALL_EMBEDDING_URL configured, running embedder in stub mode"
            );
            Arc::new(StubEmbedder::new(config.vector_dim))
        }
    };

    let pii_capability = match &config.pii_url {
        Some(url) => PiiCapability::Detector(Arc::new(HttpPiiDetector::new(url.clone())?)),
        None => {
            tracing::warn!("No RECALL_PII_URL configured, PII redaction disabled");
            PiiCapability::Unavailable
        }
    };
    let redactor = PiiRedactor::new(pii_capability);

    let scorer_capability = match &config.scorer_url {
        Some(url) => ScorerCapability::Scorer(Arc::new(HttpRelevanceScorer::new(url.clone())?)),
        None => {
            tracing::warn!(
                "No RECALL_SCORER_URL configured, verification uses the lexical heuristic"
            );
            ScorerCapability::Unavailable
        }
    };
    let verifier = EquivalenceVerifier::new(scorer_capability);

    let primary = OpenAiProvider::new(
        config.primary_provider == "openai",
        config.openai_api_key.clone(),
        config.openai_model.clone(),
    )?;
    let fallback = OllamaProvider::new(config.ollama_base_url.clone(), config.ollama_model.clone())?;
    let dispatcher = Arc::new(Dispatcher::new(primary, fallback));

    let state = HandlerState::new(
        embedder,
        redactor,
        verifier,
        cache,
        retriever,
        dispatcher,
        config.cache_threshold,
        config.retrieve_top_k,
    );

    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Recall shutdown complete");
    Ok(())
}

fn run_health_check() -> i32 {
    let port = std::env::var("RECALL_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime");

    rt.block_on(async {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
            .expect("failed to build client");

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
