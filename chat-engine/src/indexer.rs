//! FAQ embedding maintenance: the startup backfill and admin writes.
//!
//! Every write of an FAQ's text or embedding goes through [`FaqIndexer`]
//! and happens under its mutex, so a text edit and the embedding computed
//! for it land together.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use support_store::{Faq, FaqPatch, FaqStore, NewFaq, embedding_text, normalize_keywords};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::ChatConfig;
use crate::embed::EmbeddingsProvider;
use crate::errors::{ChatError, EmbeddingError, FaqValidationError};

/// Summary of one [`FaqIndexer::initialize_missing`] pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexReport {
    pub total: usize,
    pub already_embedded: usize,
    pub embedded: usize,
    pub failed: usize,
    /// Edited or deleted while their embedding was being computed.
    pub stale: usize,
}

pub struct FaqIndexer<S> {
    store: Arc<S>,
    provider: Arc<dyn EmbeddingsProvider>,
    timeout: Duration,
    concurrency: usize,
    write_lock: Mutex<()>,
}

impl<S: FaqStore> FaqIndexer<S> {
    pub fn new(store: Arc<S>, provider: Arc<dyn EmbeddingsProvider>, config: &ChatConfig) -> Self {
        Self {
            store,
            provider,
            timeout: config.embedding_timeout,
            concurrency: config.embedding_concurrency.max(1),
            write_lock: Mutex::new(()),
        }
    }

    /// Embeds every FAQ that has no embedding yet. Per-FAQ failures are
    /// logged and counted; the pass itself only fails on store errors.
    pub async fn initialize_missing(&self) -> Result<IndexReport, ChatError> {
        let faqs = self.store.get_faqs().await?;
        let mut report = IndexReport {
            total: faqs.len(),
            ..Default::default()
        };

        let pending: Vec<Faq> = faqs.into_iter().filter(|f| f.embedding.is_none()).collect();
        report.already_embedded = report.total - pending.len();
        info!(
            total = report.total,
            pending = pending.len(),
            concurrency = self.concurrency,
            provider = self.provider.name(),
            "faq embedding initialization started"
        );

        if pending.is_empty() {
            return Ok(report);
        }

        let results: Vec<(u64, String, Result<Vec<f32>, EmbeddingError>)> = stream::iter(pending)
            .map(|faq| async move {
                let text = faq.embedding_text();
                let res = self.embed(&text).await;
                (faq.id, text, res)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        for (id, text, res) in results {
            let vector = match res {
                Ok(v) => v,
                Err(e) => {
                    warn!(faq_id = id, error = %e, "faq embedding failed");
                    report.failed += 1;
                    continue;
                }
            };

            let _guard = self.write_lock.lock().await;
            match self.store.get_faq(id).await? {
                Some(current) if current.embedding_text() == text => {
                    if let Err(e) = self.store.update_faq_embedding(id, vector).await {
                        warn!(faq_id = id, error = %e, "faq embedding rejected by store");
                        report.failed += 1;
                        continue;
                    }
                    debug!(faq_id = id, "faq embedded");
                    report.embedded += 1;
                }
                _ => {
                    debug!(faq_id = id, "faq changed during indexing, skipped");
                    report.stale += 1;
                }
            }
        }

        info!(
            embedded = report.embedded,
            failed = report.failed,
            stale = report.stale,
            "faq embedding initialization completed"
        );
        Ok(report)
    }

    /// Validates and stores a new FAQ together with its embedding (or
    /// without one when the provider fails).
    pub async fn create(&self, faq: NewFaq) -> Result<Faq, ChatError> {
        validate_new(&faq)?;
        let keywords = normalize_keywords(&faq.keywords);
        let embedding = self
            .embed_or_none(&embedding_text(faq.question.trim(), &keywords))
            .await;

        let _guard = self.write_lock.lock().await;
        let stored = self
            .store
            .insert_faq(NewFaq {
                keywords,
                embedding,
                ..faq
            })
            .await?;
        info!(faq_id = stored.id, embedded = stored.embedding.is_some(), "faq created");
        Ok(stored)
    }

    /// Applies `patch`. When question or keywords change (or the FAQ has no
    /// embedding yet) the embedding is recomputed and written in the same
    /// store call as the text.
    pub async fn update(&self, id: u64, patch: FaqPatch) -> Result<Faq, ChatError> {
        validate_patch(&patch)?;

        let _guard = self.write_lock.lock().await;
        let current = self
            .store
            .get_faq(id)
            .await?
            .ok_or(ChatError::FaqNotFound(id))?;

        let next = patch.apply_to(&current);
        let unchanged = next.embedding_text() == current.embedding_text();
        let embedding = match current.embedding {
            Some(e) if unchanged => Some(e),
            _ => {
                debug!(faq_id = id, text_changed = !unchanged, "re-embedding faq");
                self.embed_or_none(&next.embedding_text()).await
            }
        };

        let stored = self.store.replace_faq(id, patch, embedding).await?;
        info!(faq_id = id, embedded = stored.embedding.is_some(), "faq updated");
        Ok(stored)
    }

    pub async fn delete(&self, id: u64) -> Result<(), ChatError> {
        let _guard = self.write_lock.lock().await;
        if self.store.delete_faq(id).await? {
            Ok(())
        } else {
            Err(ChatError::FaqNotFound(id))
        }
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        match tokio::time::timeout(self.timeout, self.provider.embed(text)).await {
            Ok(res) => res,
            Err(_) => Err(EmbeddingError::Provider(format!(
                "timed out after {} ms",
                self.timeout.as_millis()
            ))),
        }
    }

    async fn embed_or_none(&self, text: &str) -> Option<Vec<f32>> {
        match self.embed(text).await {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(error = %e, "faq embedding failed, storing without one");
                None
            }
        }
    }
}

fn validate_new(faq: &NewFaq) -> Result<(), FaqValidationError> {
    if faq.topic.trim().is_empty() {
        return Err(FaqValidationError::EmptyTopic);
    }
    if faq.question.trim().is_empty() {
        return Err(FaqValidationError::EmptyQuestion);
    }
    if faq.answer.trim().is_empty() {
        return Err(FaqValidationError::EmptyAnswer);
    }
    if normalize_keywords(&faq.keywords).is_empty() {
        return Err(FaqValidationError::NoKeywords);
    }
    Ok(())
}

/// Fields present in a patch must not be blank.
fn validate_patch(patch: &FaqPatch) -> Result<(), FaqValidationError> {
    let blank = |v: &Option<String>| v.as_deref().is_some_and(|s| s.trim().is_empty());
    if blank(&patch.topic) {
        return Err(FaqValidationError::EmptyTopic);
    }
    if blank(&patch.question) {
        return Err(FaqValidationError::EmptyQuestion);
    }
    if blank(&patch.answer) {
        return Err(FaqValidationError::EmptyAnswer);
    }
    if patch
        .keywords
        .as_ref()
        .is_some_and(|k| normalize_keywords(k).is_empty())
    {
        return Err(FaqValidationError::NoKeywords);
    }
    Ok(())
}
