//! Test doubles shared by the unit tests of this crate.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use support_store::{Faq, FaqPatch, FaqStore, MemoryStore, NewFaq, StoreError};

use crate::embed::EmbeddingsProvider;
use crate::errors::EmbeddingError;

type EmbedFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<f32>, EmbeddingError>> + Send + 'a>>;

pub fn faq(
    topic: &str,
    question: &str,
    answer: &str,
    keywords: &[&str],
    embedding: Option<Vec<f32>>,
) -> NewFaq {
    NewFaq {
        topic: topic.into(),
        question: question.into(),
        answer: answer.into(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        embedding,
    }
}

/// Returns the same vector for every input and counts calls.
#[derive(Default)]
pub struct FixedEmbedder {
    vector: Vec<f32>,
    calls: AtomicUsize,
}

impl FixedEmbedder {
    pub fn new(vector: Vec<f32>) -> Self {
        Self {
            vector,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EmbeddingsProvider for FixedEmbedder {
    fn embed<'a>(&'a self, _text: &'a str) -> EmbedFuture<'a> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let v = self.vector.clone();
        Box::pin(async move { Ok(v) })
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// Embeds by keyword: texts containing a key get that key's vector,
/// anything else fails.
pub struct KeyedEmbedder {
    pub table: Vec<(&'static str, Vec<f32>)>,
}

impl EmbeddingsProvider for KeyedEmbedder {
    fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a> {
        let lowered = text.to_lowercase();
        let hit = self
            .table
            .iter()
            .find(|(k, _)| lowered.contains(k))
            .map(|(_, v)| v.clone());
        Box::pin(async move { hit.ok_or_else(|| EmbeddingError::Provider("no vector".into())) })
    }

    fn name(&self) -> &str {
        "keyed"
    }
}

pub struct FailingEmbedder;

impl EmbeddingsProvider for FailingEmbedder {
    fn embed<'a>(&'a self, _text: &'a str) -> EmbedFuture<'a> {
        Box::pin(async { Err(EmbeddingError::Provider("model not loaded".into())) })
    }

    fn name(&self) -> &str {
        "failing"
    }
}

pub struct SlowEmbedder {
    delay: Duration,
    vector: Vec<f32>,
}

impl SlowEmbedder {
    pub fn new(delay: Duration, vector: Vec<f32>) -> Self {
        Self { delay, vector }
    }
}

impl EmbeddingsProvider for SlowEmbedder {
    fn embed<'a>(&'a self, _text: &'a str) -> EmbedFuture<'a> {
        Box::pin(async move {
            tokio::time::sleep(self.delay).await;
            Ok(self.vector.clone())
        })
    }

    fn name(&self) -> &str {
        "slow"
    }
}

/// `FaqStore` over a [`MemoryStore`] that counts retrieval reads.
pub struct SpyFaqStore {
    inner: Arc<MemoryStore>,
    keyword_searches: AtomicUsize,
    embedded_reads: AtomicUsize,
}

impl SpyFaqStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner: Arc::new(inner),
            keyword_searches: AtomicUsize::new(0),
            embedded_reads: AtomicUsize::new(0),
        }
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    pub fn keyword_searches(&self) -> usize {
        self.keyword_searches.load(Ordering::SeqCst)
    }

    pub fn embedded_reads(&self) -> usize {
        self.embedded_reads.load(Ordering::SeqCst)
    }
}

impl FaqStore for SpyFaqStore {
    async fn get_faqs(&self) -> Result<Vec<Faq>, StoreError> {
        self.inner.get_faqs().await
    }

    async fn get_faq(&self, id: u64) -> Result<Option<Faq>, StoreError> {
        self.inner.get_faq(id).await
    }

    async fn get_faqs_by_topic(&self, topic: &str) -> Result<Vec<Faq>, StoreError> {
        self.inner.get_faqs_by_topic(topic).await
    }

    async fn get_faq_topics(&self) -> Result<Vec<String>, StoreError> {
        self.inner.get_faq_topics().await
    }

    async fn search_faqs_by_keywords(&self, keywords: &[String]) -> Result<Vec<Faq>, StoreError> {
        self.keyword_searches.fetch_add(1, Ordering::SeqCst);
        self.inner.search_faqs_by_keywords(keywords).await
    }

    async fn get_faqs_with_embeddings(&self) -> Result<Vec<Faq>, StoreError> {
        self.embedded_reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get_faqs_with_embeddings().await
    }

    async fn update_faq_embedding(&self, id: u64, embedding: Vec<f32>) -> Result<(), StoreError> {
        self.inner.update_faq_embedding(id, embedding).await
    }

    async fn insert_faq(&self, faq: NewFaq) -> Result<Faq, StoreError> {
        self.inner.insert_faq(faq).await
    }

    async fn replace_faq(
        &self,
        id: u64,
        patch: FaqPatch,
        embedding: Option<Vec<f32>>,
    ) -> Result<Faq, StoreError> {
        self.inner.replace_faq(id, patch, embedding).await
    }

    async fn delete_faq(&self, id: u64) -> Result<bool, StoreError> {
        self.inner.delete_faq(id).await
    }
}
