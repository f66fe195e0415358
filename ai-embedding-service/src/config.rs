//! Embedding model config loaded from environment variables.
//!
//! # Environment variables
//!
//! - `EMBEDDING_MODEL`           = embedding model name; when unset the
//!   service is considered disabled and [`EmbeddingModelConfig::from_env`]
//!   returns `Ok(None)`
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (mandatory when a model is set)
//! - `EMBEDDING_DIM`             = optional expected vector length
//! - `EMBEDDING_HTTP_TIMEOUT_SECS` = optional HTTP client timeout (default 30)

use crate::error_handler::{
    ConfigError, EmbeddingServiceError, Result, opt_number, validate_http_endpoint,
};

/// Default HTTP timeout for the embedding client, in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Configuration of the embedding backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddingModelConfig {
    /// Base URL of the Ollama server, e.g. `http://localhost:11434`.
    pub endpoint: String,
    /// Model identifier, e.g. `all-minilm`.
    pub model: String,
    /// Expected embedding dimension; vectors of another length are rejected.
    pub expected_dim: Option<usize>,
    /// HTTP client timeout in seconds.
    pub timeout_secs: u64,
}

impl EmbeddingModelConfig {
    /// Reads the config from the process environment.
    ///
    /// Returns `Ok(None)` when `EMBEDDING_MODEL` is not configured.
    pub fn from_env() -> Result<Option<Self>> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads values through `lookup`.
    ///
    /// # Errors
    /// - [`ConfigError::MissingVar`] if the endpoint is missing
    /// - [`ConfigError::InvalidNumber`] for malformed numbers
    /// - [`ConfigError::InvalidFormat`] for a non-HTTP endpoint
    pub fn from_lookup<F>(lookup: F) -> Result<Option<Self>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let model = match lookup("EMBEDDING_MODEL") {
            Some(m) if !m.trim().is_empty() => m.trim().to_string(),
            _ => return Ok(None),
        };

        let endpoint = ollama_endpoint(&lookup)?;
        validate_http_endpoint("OLLAMA_URL", &endpoint)?;

        let expected_dim = opt_number::<_, usize>(&lookup, "EMBEDDING_DIM")?;
        if expected_dim == Some(0) {
            return Err(ConfigError::OutOfRange {
                field: "EMBEDDING_DIM",
                detail: "must be greater than zero",
            }
            .into());
        }

        let timeout_secs = opt_number::<_, u64>(&lookup, "EMBEDDING_HTTP_TIMEOUT_SECS")?
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);

        Ok(Some(Self {
            endpoint,
            model,
            expected_dim,
            timeout_secs,
        }))
    }

    /// Checks invariants for configs built by hand.
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel.into());
        }
        validate_http_endpoint("OLLAMA_URL", self.endpoint.trim())
    }
}

/// Resolves the Ollama endpoint.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
fn ollama_endpoint<F>(lookup: &F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("OLLAMA_URL") {
        if !url.trim().is_empty() {
            return Ok(url.trim().to_string());
        }
    }
    if let Some(port) = lookup("OLLAMA_PORT") {
        if !port.trim().is_empty() {
            let port = port
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: "OLLAMA_PORT",
                    reason: "expected u16 (1..=65535)",
                })?;
            return Ok(format!("http://localhost:{port}"));
        }
    }
    Err(EmbeddingServiceError::Config(ConfigError::MissingVar(
        "OLLAMA_URL or OLLAMA_PORT",
    )))
}
