use std::sync::Arc;

use ai_embedding_service::{EmbeddingModelConfig, HealthService, OllamaEmbeddingService};
use chat_engine::{
    ChatConfig, ChatbotService, EmbeddingsProvider, FaqIndexer, NoopEmbedder, OllamaEmbedder,
};
use support_store::{MemoryStore, SeedData};
use tracing::{info, warn};

use crate::error_handler::AppError;

/// Timeout of the health probe HTTP client, in seconds.
const HEALTH_TIMEOUT_SECS: u64 = 5;

/// Shared state for all HTTP handlers.
pub struct AppState {
    pub store: Arc<MemoryStore>,
    pub chatbot: ChatbotService<MemoryStore>,
    /// Serializes FAQ text/embedding writes (admin routes and startup indexing).
    pub indexer: FaqIndexer<MemoryStore>,
    /// `None` when no embedding model is configured.
    pub embedding: Option<EmbeddingModelConfig>,
    pub health: Option<HealthService>,
}

impl AppState {
    pub fn new(
        store: Arc<MemoryStore>,
        provider: Arc<dyn EmbeddingsProvider>,
        config: ChatConfig,
        embedding: Option<EmbeddingModelConfig>,
        health: Option<HealthService>,
    ) -> Self {
        let indexer = FaqIndexer::new(store.clone(), provider.clone(), &config);
        let chatbot = ChatbotService::new(store.clone(), provider, config);
        Self {
            store,
            chatbot,
            indexer,
            embedding,
            health,
        }
    }

    /// Load shared state from environment variables.
    ///
    /// Without `EMBEDDING_MODEL` the chat runs on keyword matching only.
    pub fn from_env() -> Result<Self, AppError> {
        let seed = SeedData::from_env()?;
        let store = Arc::new(MemoryStore::from_seed(seed)?);
        let config = ChatConfig::from_env()?;

        let embedding = EmbeddingModelConfig::from_env()
            .map_err(|e| AppError::Config(e.to_string()))?;

        let (provider, health): (Arc<dyn EmbeddingsProvider>, Option<HealthService>) =
            match &embedding {
                Some(cfg) => {
                    let svc = OllamaEmbeddingService::new(cfg.clone())
                        .map_err(|e| AppError::Config(e.to_string()))?;
                    let health = HealthService::new(Some(HEALTH_TIMEOUT_SECS))
                        .map_err(|e| AppError::Config(e.to_string()))?;
                    info!(model = %cfg.model, endpoint = %cfg.endpoint, "embedding provider enabled");
                    (Arc::new(OllamaEmbedder::new(svc)), Some(health))
                }
                None => {
                    warn!("EMBEDDING_MODEL not set; FAQ retrieval uses keyword matching only");
                    (Arc::new(NoopEmbedder), None)
                }
            };

        Ok(Self::new(store, provider, config, embedding, health))
    }
}
