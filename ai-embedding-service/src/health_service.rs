//! Health probe for the embedding backend.
//!
//! Ollama: `GET {endpoint}/api/tags` (best-effort model existence check).
//!
//! The returned [`HealthStatus`] is JSON-serializable and suitable for a
//! `/health` endpoint. [`HealthService::check`] never fails; errors are
//! mapped to `ok=false`.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::EmbeddingModelConfig;
use crate::error_handler::{EmbeddingServiceError, Result, make_snippet};

/// A serializable health snapshot of the embedding backend.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    /// Backend name ("Ollama" or "disabled").
    pub provider: String,
    /// Target endpoint base URL (empty when disabled).
    pub endpoint: String,
    /// Model identifier, if configured.
    pub model: Option<String>,
    /// Overall health flag.
    pub ok: bool,
    /// Measured latency of the probe in milliseconds.
    pub latency_ms: u128,
    /// Short human-readable message with details.
    pub message: String,
}

impl HealthStatus {
    /// Status reported when no embedding model is configured.
    pub fn disabled() -> Self {
        Self {
            provider: "disabled".into(),
            endpoint: String::new(),
            model: None,
            ok: false,
            latency_ms: 0,
            message: "no embedding model configured; keyword search only".into(),
        }
    }

    fn new(cfg: &EmbeddingModelConfig, ok: bool, latency_ms: u128, message: impl Into<String>) -> Self {
        Self {
            provider: "Ollama".into(),
            endpoint: cfg.endpoint.clone(),
            model: Some(cfg.model.clone()),
            ok,
            latency_ms,
            message: message.into(),
        }
    }
}

/// Health checker with its own short-timeout HTTP client.
pub struct HealthService {
    client: reqwest::Client,
}

impl HealthService {
    /// Creates a new health service with an optional client timeout (seconds).
    ///
    /// # Errors
    /// Returns [`EmbeddingServiceError::HttpTransport`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self> {
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(5));
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        info!(
            default_timeout_secs = timeout.as_secs(),
            "HealthService initialized"
        );

        Ok(Self { client })
    }

    /// Checks the configured backend. Never returns an error.
    pub async fn check(&self, cfg: &EmbeddingModelConfig) -> HealthStatus {
        let start = Instant::now();
        match self.try_probe_ollama(cfg).await {
            Ok(status) => {
                info!(
                    endpoint = %status.endpoint,
                    ok = status.ok,
                    latency_ms = status.latency_ms,
                    "embedding health probe completed"
                );
                status
            }
            Err(err) => {
                let status = HealthStatus::new(cfg, false, start.elapsed().as_millis(), err.to_string());
                warn!(
                    endpoint = %status.endpoint,
                    latency_ms = status.latency_ms,
                    message = %status.message,
                    "embedding health probe failed"
                );
                status
            }
        }
    }

    /// Strict Ollama probe: `GET /api/tags`, then look for the model name.
    async fn try_probe_ollama(&self, cfg: &EmbeddingModelConfig) -> Result<HealthStatus> {
        let url = format!("{}/api/tags", cfg.endpoint.trim_end_matches('/'));
        let start = Instant::now();
        debug!(model = %cfg.model, "GET {}", url);

        let resp = self.client.get(&url).send().await?;
        let latency = start.elapsed().as_millis();

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(EmbeddingServiceError::HttpStatus {
                status,
                url,
                snippet: make_snippet(&text),
            });
        }

        match resp.json::<Tags>().await {
            Ok(tags) => Ok(status_from_tags(cfg, &tags, latency)),
            Err(e) => {
                warn!(error = %e, "failed to decode /api/tags; treating server as reachable");
                Ok(HealthStatus::new(
                    cfg,
                    true,
                    latency,
                    format!("Ollama is reachable; failed to decode /api/tags: {e}"),
                ))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct Tag {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Tags {
    models: Option<Vec<Tag>>,
}

/// Ollama reports tagged names (`all-minilm:latest`); an untagged config name
/// matches its `:latest` variant.
fn status_from_tags(cfg: &EmbeddingModelConfig, tags: &Tags, latency: u128) -> HealthStatus {
    let Some(models) = tags.models.as_ref() else {
        return HealthStatus::new(cfg, true, latency, "Ollama is healthy; tags response without `models` field");
    };

    let wanted = cfg.model.as_str();
    let exists = models
        .iter()
        .any(|m| m.name == wanted || m.name.strip_suffix(":latest") == Some(wanted));

    if exists {
        HealthStatus::new(cfg, true, latency, "Ollama is healthy; embedding model is available")
    } else {
        HealthStatus::new(cfg, false, latency, "Ollama is up, but model not found in /api/tags")
    }
}
