//! Unified error types for the crate.

use support_store::StoreError;
use thiserror::Error;

/// Error returned by embedding providers.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// No provider is configured.
    #[error("embedding provider unavailable")]
    Unavailable,

    /// The provider was reached but failed.
    #[error("embedding provider failed: {0}")]
    Provider(String),

    /// The provider answered with a vector of the wrong size.
    #[error("embedding size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },
}

impl From<ai_embedding_service::EmbeddingServiceError> for EmbeddingError {
    fn from(e: ai_embedding_service::EmbeddingServiceError) -> Self {
        use ai_embedding_service::EmbeddingServiceError as E;
        match e {
            E::DimensionMismatch { got, want } => Self::VectorSizeMismatch { got, want },
            other => Self::Provider(other.to_string()),
        }
    }
}

/// Comparing two vectors of different length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SimilarityError {
    #[error("vector dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },
}

/// Rejected admin FAQ input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FaqValidationError {
    #[error("topic must not be empty")]
    EmptyTopic,
    #[error("question must not be empty")]
    EmptyQuestion,
    #[error("answer must not be empty")]
    EmptyAnswer,
    #[error("at least one keyword is required")]
    NoKeywords,
}

/// Error for chat turns and FAQ administration.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Validation(#[from] FaqValidationError),

    #[error("faq {0} not found")]
    FaqNotFound(u64),

    /// A reply payload could not be serialized.
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Config(String),
}
