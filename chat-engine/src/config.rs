//! Runtime knobs of the chat pipeline, loaded from environment variables.
//!
//! - `FAQ_SIMILARITY_THRESHOLD` = semantic match threshold in `0.0..=1.0` (default 0.65)
//! - `EMBEDDING_TIMEOUT_MS`     = bound on one embedding call (default 5000)
//! - `EMBEDDING_CONCURRENCY`    = parallel embeddings during indexing (default 4)

use std::time::Duration;

use ai_embedding_service::error_handler::{opt_number, validate_range_f32};

use crate::errors::ChatError;
use crate::similarity::DEFAULT_SIMILARITY_THRESHOLD;

pub const DEFAULT_EMBEDDING_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_EMBEDDING_CONCURRENCY: usize = 4;

#[derive(Clone, Debug, PartialEq)]
pub struct ChatConfig {
    pub similarity_threshold: f32,
    pub embedding_timeout: Duration,
    pub embedding_concurrency: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            embedding_timeout: Duration::from_millis(DEFAULT_EMBEDDING_TIMEOUT_MS),
            embedding_concurrency: DEFAULT_EMBEDDING_CONCURRENCY,
        }
    }
}

impl ChatConfig {
    pub fn from_env() -> Result<Self, ChatError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads values through `lookup`.
    ///
    /// # Errors
    /// [`ChatError::Config`] for malformed numbers, a threshold outside
    /// `0.0..=1.0` or a zero timeout.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ChatError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let cfg_err = |e: ai_embedding_service::EmbeddingServiceError| ChatError::Config(e.to_string());

        let similarity_threshold = opt_number::<_, f32>(&lookup, "FAQ_SIMILARITY_THRESHOLD")
            .map_err(cfg_err)?
            .unwrap_or(DEFAULT_SIMILARITY_THRESHOLD);
        validate_range_f32("FAQ_SIMILARITY_THRESHOLD", similarity_threshold, 0.0, 1.0)
            .map_err(cfg_err)?;

        let timeout_ms = opt_number::<_, u64>(&lookup, "EMBEDDING_TIMEOUT_MS")
            .map_err(cfg_err)?
            .unwrap_or(DEFAULT_EMBEDDING_TIMEOUT_MS);
        if timeout_ms == 0 {
            return Err(ChatError::Config(
                "EMBEDDING_TIMEOUT_MS must be greater than zero".into(),
            ));
        }

        let embedding_concurrency = opt_number::<_, usize>(&lookup, "EMBEDDING_CONCURRENCY")
            .map_err(cfg_err)?
            .unwrap_or(DEFAULT_EMBEDDING_CONCURRENCY)
            .max(1);

        Ok(Self {
            similarity_threshold,
            embedding_timeout: Duration::from_millis(timeout_ms),
            embedding_concurrency,
        })
    }
}
