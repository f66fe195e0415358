//! Core of the support chat.
//!
//! A user message flows through:
//! lexical analysis -> intent classification -> branch
//! (order lookup | product search | human handoff | FAQ retrieval) -> reply.
//!
//! FAQ retrieval tries embedding similarity first and falls back to keyword
//! matching whenever the provider is unavailable, fails, times out, or
//! nothing clears the threshold.

pub mod chatbot;
pub mod compose;
pub mod config;
pub mod embed;
pub mod errors;
pub mod indexer;
pub mod intent;
pub mod lexical;
pub mod retrieval;
pub mod similarity;

#[cfg(test)]
pub(crate) mod testing;

pub use chatbot::{ChatbotService, TurnOutcome, TurnPlan, TurnSummary};
pub use compose::{MessageContent, OrderStatusPayload, Payload, ProductCard, Reply};
pub use config::ChatConfig;
pub use embed::{EmbeddingsProvider, NoopEmbedder, OllamaEmbedder};
pub use errors::{ChatError, EmbeddingError, FaqValidationError, SimilarityError};
pub use indexer::{FaqIndexer, IndexReport};
pub use intent::{Classification, Intent, analyze, classify};
pub use retrieval::{FallbackReason, FaqRetriever, RetrievalOutcome};
pub use similarity::{DEFAULT_SIMILARITY_THRESHOLD, SimilarityMatch, cosine_similarity, find_similar};
