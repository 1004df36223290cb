use std::sync::Arc;

use crate::cache::SemanticCache;
use crate::embedding::Embedder;
use crate::llm::{ChatProvider, Dispatcher};
use crate::pii::PiiRedactor;
use crate::retrieval::DocumentRetriever;
use crate::scoring::EquivalenceVerifier;
use crate::vectordb::VectorDbClient;

/// Per-process handler state: stateless service objects constructed once at
/// startup and shared by reference across requests.
pub struct HandlerState<C: VectorDbClient, P: ChatProvider, F: ChatProvider> {
    pub embedder: Arc<dyn Embedder>,
    pub redactor: PiiRedactor,
    pub verifier: EquivalenceVerifier,
    pub cache: Arc<SemanticCache<C>>,
    pub retriever: Arc<DocumentRetriever<C>>,
    pub dispatcher: Arc<Dispatcher<P, F>>,

    /// Similarity threshold applied when the request carries no override.
    pub default_threshold: f32,
    /// Document chunks fetched per slow-path request.
    pub retrieve_top_k: usize,
}

impl<C: VectorDbClient, P: ChatProvider, F: ChatProvider> Clone for HandlerState<C, P, F> {
    fn clone(&self) -> Self {
        Self {
            embedder: self.embedder.clone(),
            redactor: self.redactor.clone(),
            verifier: self.verifier.clone(),
            cache: self.cache.clone(),
            retriever: self.retriever.clone(),
            dispatcher: self.dispatcher.clone(),
            default_threshold: self.default_threshold,
            retrieve_top_k: self.retrieve_top_k,
        }
    }
}

impl<C: VectorDbClient, P: ChatProvider, F: ChatProvider> HandlerState<C, P, F> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        embedder: Arc<dyn Embedder>,
        redactor: PiiRedactor,
        verifier: EquivalenceVerifier,
        cache: Arc<SemanticCache<C>>,
        retriever: Arc<DocumentRetriever<C>>,
        dispatcher: Arc<Dispatcher<P, F>>,
        default_threshold: f32,
        retrieve_top_k: usize,
    ) -> Self {
        Self {
            embedder,
            redactor,
            verifier,
            cache,
            retriever,
            dispatcher,
            default_threshold,
            retrieve_top_k,
        }
    }
}
