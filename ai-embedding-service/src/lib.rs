//! Embedding backend for the support chat: an Ollama client, env-driven
//! config, a health probe and the workspace tracing layer.

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod ollama_service;
pub mod telemetry;

pub use config::EmbeddingModelConfig;
pub use error_handler::{ConfigError, EmbeddingServiceError};
pub use health_service::{HealthService, HealthStatus};
pub use ollama_service::OllamaEmbeddingService;
