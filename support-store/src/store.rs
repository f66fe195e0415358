//! Store contracts consumed by the chat engine and the API.
//!
//! Split by concern so that callers (and test doubles) only depend on what
//! they use. All operations are async; implementations decide whether data
//! lives in memory or in a database.

use std::future::Future;

use crate::errors::StoreError;
use crate::record::{Faq, FaqPatch, Message, NewFaq, NewMessage, Order, Product};

/// FAQ reads and writes.
pub trait FaqStore: Send + Sync {
    /// All FAQs in storage order.
    fn get_faqs(&self) -> impl Future<Output = Result<Vec<Faq>, StoreError>> + Send;

    fn get_faq(&self, id: u64) -> impl Future<Output = Result<Option<Faq>, StoreError>> + Send;

    /// FAQs whose topic equals `topic`, case-insensitively.
    fn get_faqs_by_topic(
        &self,
        topic: &str,
    ) -> impl Future<Output = Result<Vec<Faq>, StoreError>> + Send;

    /// Distinct topics in first-seen order.
    fn get_faq_topics(&self) -> impl Future<Output = Result<Vec<String>, StoreError>> + Send;

    /// FAQs where any keyword equals one of the FAQ keywords or is contained
    /// in its question or answer (all lowercased). Storage order.
    fn search_faqs_by_keywords(
        &self,
        keywords: &[String],
    ) -> impl Future<Output = Result<Vec<Faq>, StoreError>> + Send;

    /// FAQs that currently carry an embedding. Storage order.
    fn get_faqs_with_embeddings(
        &self,
    ) -> impl Future<Output = Result<Vec<Faq>, StoreError>> + Send;

    /// Sets the embedding of an existing FAQ.
    fn update_faq_embedding(
        &self,
        id: u64,
        embedding: Vec<f32>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Inserts a new FAQ (keywords normalized) and returns it with its id.
    fn insert_faq(&self, faq: NewFaq) -> impl Future<Output = Result<Faq, StoreError>> + Send;

    /// Applies `patch` and sets `embedding` in one write.
    fn replace_faq(
        &self,
        id: u64,
        patch: FaqPatch,
        embedding: Option<Vec<f32>>,
    ) -> impl Future<Output = Result<Faq, StoreError>> + Send;

    /// Removes an FAQ; `Ok(false)` when it did not exist.
    fn delete_faq(&self, id: u64) -> impl Future<Output = Result<bool, StoreError>> + Send;
}

/// Product and order reads.
pub trait CatalogStore: Send + Sync {
    fn get_products(&self) -> impl Future<Output = Result<Vec<Product>, StoreError>> + Send;

    fn get_products_by_category(
        &self,
        category: &str,
    ) -> impl Future<Output = Result<Vec<Product>, StoreError>> + Send;

    /// Case-insensitive substring search over name, description and category.
    fn search_products(
        &self,
        term: &str,
    ) -> impl Future<Output = Result<Vec<Product>, StoreError>> + Send;

    /// Case-insensitive lookup by order number.
    fn get_order_by_number(
        &self,
        order_number: &str,
    ) -> impl Future<Output = Result<Option<Order>, StoreError>> + Send;
}

/// Append-only chat history.
pub trait MessageStore: Send + Sync {
    fn create_message(
        &self,
        message: NewMessage,
    ) -> impl Future<Output = Result<Message, StoreError>> + Send;

    fn get_messages_by_session(
        &self,
        session_id: &str,
    ) -> impl Future<Output = Result<Vec<Message>, StoreError>> + Send;

    /// Deletes every message of `session_id`; returns how many were removed.
    fn clear_session(
        &self,
        session_id: &str,
    ) -> impl Future<Output = Result<usize, StoreError>> + Send;
}

/// Everything the chat service needs from one backing store.
pub trait SupportStore: FaqStore + CatalogStore + MessageStore {}

impl<T> SupportStore for T where T: FaqStore + CatalogStore + MessageStore {}
