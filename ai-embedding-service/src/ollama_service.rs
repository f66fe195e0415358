//! Thin Ollama client for embeddings.
//!
//! Calls `POST {endpoint}/api/embeddings` with `{ model, prompt }` and expects
//! `{ embedding: number[] }` back.
//!
//! # Examples
//!
//! ```no_run
//! use ai_embedding_service::config::EmbeddingModelConfig;
//! use ai_embedding_service::ollama_service::OllamaEmbeddingService;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = EmbeddingModelConfig {
//!     endpoint: "http://localhost:11434".into(),
//!     model: "all-minilm".into(),
//!     expected_dim: Some(384),
//!     timeout_secs: 30,
//! };
//! let svc = OllamaEmbeddingService::new(cfg)?;
//! let v = svc.embed("How long does shipping take?").await?;
//! println!("dimension = {}", v.len());
//! # Ok(()) }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::EmbeddingModelConfig;
use crate::error_handler::{EmbeddingServiceError, Result, make_snippet};

/// Reusable HTTP client bound to one embedding model.
#[derive(Debug)]
pub struct OllamaEmbeddingService {
    client: reqwest::Client,
    cfg: EmbeddingModelConfig,
    url_embeddings: String,
}

impl OllamaEmbeddingService {
    /// Creates a new service from the given config.
    ///
    /// # Errors
    /// - [`EmbeddingServiceError::Config`] if the config is invalid
    /// - [`EmbeddingServiceError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: EmbeddingModelConfig) -> Result<Self> {
        cfg.validate()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs.max(1)))
            .brotli(true)
            .build()?;

        let base = cfg.endpoint.trim().trim_end_matches('/').to_string();
        let url_embeddings = format!("{base}/api/embeddings");

        Ok(Self {
            client,
            cfg,
            url_embeddings,
        })
    }

    /// Model config this client was built with.
    pub fn config(&self) -> &EmbeddingModelConfig {
        &self.cfg
    }

    /// Retrieves an embedding for `input`.
    ///
    /// # Errors
    /// - [`EmbeddingServiceError::HttpStatus`] for non-2xx responses
    /// - [`EmbeddingServiceError::HttpTransport`] for client errors
    /// - [`EmbeddingServiceError::Decode`] if the response cannot be parsed or is empty
    /// - [`EmbeddingServiceError::DimensionMismatch`] if `expected_dim` is set and differs
    #[instrument(skip_all, fields(model = %self.cfg.model, chars = input.len()))]
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>> {
        let body = EmbeddingsRequest {
            model: &self.cfg.model,
            prompt: input,
        };

        debug!("POST {}", self.url_embeddings);
        let resp = self
            .client
            .post(&self.url_embeddings)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(EmbeddingServiceError::HttpStatus {
                status,
                url: self.url_embeddings.clone(),
                snippet: make_snippet(&text),
            });
        }

        let out: EmbeddingsResponse = resp.json().await.map_err(|e| {
            EmbeddingServiceError::Decode(format!(
                "serde error: {e}; expected `{{ embedding: number[] }}`"
            ))
        })?;

        check_vector(out.embedding, self.cfg.expected_dim)
    }
}

/// Rejects empty vectors and enforces the expected dimension.
fn check_vector(v: Vec<f32>, expected_dim: Option<usize>) -> Result<Vec<f32>> {
    if v.is_empty() {
        return Err(EmbeddingServiceError::Decode(
            "empty embedding returned by model".into(),
        ));
    }
    if let Some(want) = expected_dim {
        if v.len() != want {
            return Err(EmbeddingServiceError::DimensionMismatch { got: v.len(), want });
        }
    }
    Ok(v)
}

/// Request body for `/api/embeddings`.
#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

/// Response body for `/api/embeddings`.
#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    embedding: Vec<f32>,
}
