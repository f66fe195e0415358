//! Unified error types for the crate.

use thiserror::Error;

/// Top-level error for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O errors while reading seed files.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing of seed data.
    #[error("parse error in {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    /// The referenced FAQ does not exist.
    #[error("faq {0} not found")]
    FaqNotFound(u64),

    /// Two orders share the same (case-insensitive) order number.
    #[error("duplicate order number: {0}")]
    DuplicateOrder(String),

    /// An embedding does not match the dimension already stored.
    #[error("embedding size mismatch: got {got}, want {want}")]
    EmbeddingSizeMismatch { got: usize, want: usize },
}
