//! Embedding provider abstraction.
//!
//! Async because real providers (Ollama) perform HTTP requests.

use std::{future::Future, pin::Pin};

use ai_embedding_service::OllamaEmbeddingService;

use crate::errors::EmbeddingError;

/// Provider interface for embedding generation.
///
/// Implement this trait to plug in another embedding backend.
pub trait EmbeddingsProvider: Send + Sync {
    /// Async embedding function.
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, EmbeddingError>> + Send + 'a>>;

    /// Short backend name for logs and health output.
    fn name(&self) -> &str;
}

/// Provider used when no embedding model is configured. Every call fails
/// with [`EmbeddingError::Unavailable`], which routes retrieval to the
/// lexical fallback.
#[derive(Clone, Debug, Default)]
pub struct NoopEmbedder;

impl EmbeddingsProvider for NoopEmbedder {
    fn embed<'a>(
        &'a self,
        _text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, EmbeddingError>> + Send + 'a>> {
        Box::pin(async { Err(EmbeddingError::Unavailable) })
    }

    fn name(&self) -> &str {
        "noop"
    }
}

/// Ollama embedding provider.
pub struct OllamaEmbedder {
    svc: OllamaEmbeddingService,
}

impl OllamaEmbedder {
    pub fn new(svc: OllamaEmbeddingService) -> Self {
        Self { svc }
    }
}

impl EmbeddingsProvider for OllamaEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, EmbeddingError>> + Send + 'a>> {
        Box::pin(async move { self.svc.embed(text).await.map_err(EmbeddingError::from) })
    }

    fn name(&self) -> &str {
        &self.svc.config().model
    }
}
