//! FAQ retrieval: semantic match first, lexical keyword match as fallback.
//!
//! The outcome records which path produced the answer and, for the lexical
//! path, why the semantic one was skipped. Provider failures never escape
//! this module; store failures do.

use std::sync::Arc;
use std::time::Duration;

use support_store::{Faq, FaqStore};
use tracing::{debug, error, warn};

use crate::embed::EmbeddingsProvider;
use crate::errors::{ChatError, EmbeddingError, SimilarityError};
use crate::lexical::tokenize;
use crate::similarity::find_similar;

/// Why semantic matching did not produce the answer.
#[derive(Clone, Debug, PartialEq)]
pub enum FallbackReason {
    ProviderUnavailable,
    ProviderFailed(String),
    ProviderTimedOut,
    /// No stored FAQ has an embedding yet.
    NoEmbeddedFaqs,
    BelowThreshold,
    /// Query vector and stored vectors differ in length.
    DimensionMismatch { expected: usize, got: usize },
}

impl FallbackReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProviderUnavailable => "provider-unavailable",
            Self::ProviderFailed(_) => "provider-failed",
            Self::ProviderTimedOut => "provider-timed-out",
            Self::NoEmbeddedFaqs => "no-embedded-faqs",
            Self::BelowThreshold => "below-threshold",
            Self::DimensionMismatch { .. } => "dimension-mismatch",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum RetrievalOutcome {
    /// Best FAQ above the similarity threshold.
    Semantic { faq: Faq, similarity: f32 },
    /// First FAQ in storage order matching a message token.
    Lexical { faq: Faq, reason: FallbackReason },
    /// Neither path found anything.
    NoMatch { reason: FallbackReason },
}

impl RetrievalOutcome {
    pub fn faq(&self) -> Option<&Faq> {
        match self {
            Self::Semantic { faq, .. } | Self::Lexical { faq, .. } => Some(faq),
            Self::NoMatch { .. } => None,
        }
    }

    pub fn answer(&self) -> Option<&str> {
        self.faq().map(|f| f.answer.as_str())
    }

    pub fn path(&self) -> &'static str {
        match self {
            Self::Semantic { .. } => "semantic",
            Self::Lexical { .. } => "lexical",
            Self::NoMatch { .. } => "none",
        }
    }

    pub fn fallback_reason(&self) -> Option<&FallbackReason> {
        match self {
            Self::Semantic { .. } => None,
            Self::Lexical { reason, .. } | Self::NoMatch { reason } => Some(reason),
        }
    }
}

/// Retrieves the FAQ answering a free-form question.
pub struct FaqRetriever<S> {
    store: Arc<S>,
    provider: Arc<dyn EmbeddingsProvider>,
    threshold: f32,
    timeout: Duration,
}

impl<S: FaqStore> FaqRetriever<S> {
    pub fn new(
        store: Arc<S>,
        provider: Arc<dyn EmbeddingsProvider>,
        threshold: f32,
        timeout: Duration,
    ) -> Self {
        Self {
            store,
            provider,
            threshold,
            timeout,
        }
    }

    /// Semantic match when possible, lexical fallback otherwise.
    ///
    /// # Errors
    /// Only store failures ([`ChatError::Store`]).
    pub async fn retrieve(&self, message: &str) -> Result<RetrievalOutcome, ChatError> {
        let reason = match self.semantic(message).await? {
            Ok((faq, similarity)) => {
                debug!(faq_id = faq.id, similarity, "semantic faq match");
                return Ok(RetrievalOutcome::Semantic { faq, similarity });
            }
            Err(reason) => reason,
        };

        let tokens = tokenize(message);
        if tokens.is_empty() {
            debug!(reason = reason.as_str(), "no tokens for lexical fallback");
            return Ok(RetrievalOutcome::NoMatch { reason });
        }

        let hits = self.store.search_faqs_by_keywords(&tokens).await?;
        match hits.into_iter().next() {
            Some(faq) => {
                debug!(faq_id = faq.id, reason = reason.as_str(), "lexical faq match");
                Ok(RetrievalOutcome::Lexical { faq, reason })
            }
            None => {
                debug!(reason = reason.as_str(), tokens = tokens.len(), "no faq match");
                Ok(RetrievalOutcome::NoMatch { reason })
            }
        }
    }

    /// Outer `Err` is a store failure; inner `Err` is the fallback reason.
    async fn semantic(
        &self,
        message: &str,
    ) -> Result<Result<(Faq, f32), FallbackReason>, ChatError> {
        let query = match tokio::time::timeout(self.timeout, self.provider.embed(message)).await {
            Ok(Ok(v)) => v,
            Ok(Err(EmbeddingError::Unavailable)) => {
                debug!(provider = self.provider.name(), "embedding provider unavailable");
                return Ok(Err(FallbackReason::ProviderUnavailable));
            }
            Ok(Err(EmbeddingError::VectorSizeMismatch { got, want })) => {
                error!(got, want, "embedding provider returned wrong dimension");
                return Ok(Err(FallbackReason::DimensionMismatch { expected: want, got }));
            }
            Ok(Err(e)) => {
                warn!(provider = self.provider.name(), error = %e, "embedding failed, using keywords");
                return Ok(Err(FallbackReason::ProviderFailed(e.to_string())));
            }
            Err(_) => {
                warn!(
                    provider = self.provider.name(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "embedding timed out, using keywords"
                );
                return Ok(Err(FallbackReason::ProviderTimedOut));
            }
        };

        let faqs = self.store.get_faqs_with_embeddings().await?;
        let embedded: Vec<(&Faq, &[f32])> = faqs
            .iter()
            .filter_map(|f| f.embedding.as_deref().map(|e| (f, e)))
            .collect();
        if embedded.is_empty() {
            return Ok(Err(FallbackReason::NoEmbeddedFaqs));
        }

        let candidates: Vec<&[f32]> = embedded.iter().map(|(_, e)| *e).collect();
        match find_similar(&query, &candidates, self.threshold) {
            Ok(hits) => {
                let best = hits
                    .first()
                    .and_then(|m| embedded.get(m.index).map(|(f, _)| ((*f).clone(), m.similarity)));
                Ok(best.ok_or(FallbackReason::BelowThreshold))
            }
            Err(SimilarityError::DimensionMismatch { left, right }) => {
                error!(
                    query_dim = left,
                    stored_dim = right,
                    "query embedding does not match stored faq embeddings"
                );
                Ok(Err(FallbackReason::DimensionMismatch {
                    expected: right,
                    got: left,
                }))
            }
        }
    }
}
