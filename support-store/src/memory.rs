//! In-memory implementation of every store contract.
//!
//! Each collection sits behind its own `tokio::sync::RwLock`. FAQ and
//! message ids come from monotonic counters and are never reused after a
//! delete or a session clear. All FAQ embeddings share one dimension, fixed
//! by the first embedding stored.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::errors::StoreError;
use crate::record::{
    Faq, FaqPatch, Message, NewFaq, NewMessage, Order, Product, normalize_keywords,
};
use crate::seed::SeedData;
use crate::store::{CatalogStore, FaqStore, MessageStore};

#[derive(Debug, Default)]
pub struct MemoryStore {
    faqs: RwLock<Vec<Faq>>,
    products: RwLock<Vec<Product>>,
    orders: RwLock<Vec<Order>>,
    messages: RwLock<Vec<Message>>,
    /// Last id handed out; bumped under the table's write lock.
    last_faq_id: AtomicU64,
    last_message_id: AtomicU64,
}

/// Counts reported by the health endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreCounts {
    pub faqs: usize,
    pub embedded_faqs: usize,
    pub products: usize,
    pub orders: usize,
    pub messages: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from seed data, assigning missing ids and
    /// normalizing FAQ keywords.
    pub fn from_seed(seed: SeedData) -> Result<Self, StoreError> {
        let SeedData {
            faqs,
            products,
            orders,
        } = seed;

        let mut dim: Option<usize> = None;
        let mut stored_faqs = Vec::with_capacity(faqs.len());
        for (i, f) in faqs.into_iter().enumerate() {
            if let Some(e) = &f.embedding {
                check_dim(&mut dim, e.len())?;
            }
            stored_faqs.push(Faq {
                id: i as u64 + 1,
                topic: f.topic.trim().to_string(),
                question: f.question.trim().to_string(),
                answer: f.answer.trim().to_string(),
                keywords: normalize_keywords(&f.keywords),
                embedding: f.embedding,
            });
        }

        let products = products
            .into_iter()
            .enumerate()
            .map(|(i, mut p)| {
                if p.id == 0 {
                    p.id = i as u64 + 1;
                }
                p
            })
            .collect::<Vec<_>>();

        let mut stored_orders: Vec<Order> = Vec::with_capacity(orders.len());
        for (i, mut o) in orders.into_iter().enumerate() {
            o.order_number = o.order_number.trim().to_uppercase();
            if stored_orders
                .iter()
                .any(|x| x.order_number == o.order_number)
            {
                return Err(StoreError::DuplicateOrder(o.order_number));
            }
            if o.id == 0 {
                o.id = i as u64 + 1;
            }
            stored_orders.push(o);
        }

        info!(
            faqs = stored_faqs.len(),
            products = products.len(),
            orders = stored_orders.len(),
            "memory store seeded"
        );

        let last_faq_id = stored_faqs.len() as u64;
        Ok(Self {
            last_faq_id: AtomicU64::new(last_faq_id),
            last_message_id: AtomicU64::new(0),
            faqs: RwLock::new(stored_faqs),
            products: RwLock::new(products),
            orders: RwLock::new(stored_orders),
            messages: RwLock::new(Vec::new()),
        })
    }

    pub async fn counts(&self) -> StoreCounts {
        let faqs = self.faqs.read().await;
        StoreCounts {
            faqs: faqs.len(),
            embedded_faqs: faqs.iter().filter(|f| f.embedding.is_some()).count(),
            products: self.products.read().await.len(),
            orders: self.orders.read().await.len(),
            messages: self.messages.read().await.len(),
        }
    }
}

/// Dimension every stored embedding must have, if any is stored.
fn current_dim(faqs: &[Faq]) -> Option<usize> {
    faqs.iter().find_map(|f| f.embedding.as_ref().map(Vec::len))
}

fn check_dim(dim: &mut Option<usize>, got: usize) -> Result<(), StoreError> {
    match *dim {
        Some(want) if want != got => Err(StoreError::EmbeddingSizeMismatch { got, want }),
        Some(_) => Ok(()),
        None => {
            *dim = Some(got);
            Ok(())
        }
    }
}

/// Like [`check_dim`], but ignores the FAQ being overwritten so that the
/// only embedded FAQ can be replaced with a different dimension.
fn check_dim_excluding(faqs: &[Faq], skip_id: Option<u64>, got: usize) -> Result<(), StoreError> {
    let want = faqs
        .iter()
        .filter(|f| Some(f.id) != skip_id)
        .find_map(|f| f.embedding.as_ref().map(Vec::len));
    match want {
        Some(want) if want != got => Err(StoreError::EmbeddingSizeMismatch { got, want }),
        _ => Ok(()),
    }
}

fn faq_matches(faq: &Faq, keywords: &[String]) -> bool {
    let question = faq.question.to_lowercase();
    let answer = faq.answer.to_lowercase();
    keywords.iter().any(|k| {
        let k = k.to_lowercase();
        !k.is_empty()
            && (faq.keywords.iter().any(|fk| fk.to_lowercase() == k)
                || question.contains(&k)
                || answer.contains(&k))
    })
}

impl FaqStore for MemoryStore {
    async fn get_faqs(&self) -> Result<Vec<Faq>, StoreError> {
        Ok(self.faqs.read().await.clone())
    }

    async fn get_faq(&self, id: u64) -> Result<Option<Faq>, StoreError> {
        Ok(self.faqs.read().await.iter().find(|f| f.id == id).cloned())
    }

    async fn get_faqs_by_topic(&self, topic: &str) -> Result<Vec<Faq>, StoreError> {
        let topic = topic.trim().to_lowercase();
        Ok(self
            .faqs
            .read()
            .await
            .iter()
            .filter(|f| f.topic.to_lowercase() == topic)
            .cloned()
            .collect())
    }

    async fn get_faq_topics(&self) -> Result<Vec<String>, StoreError> {
        let faqs = self.faqs.read().await;
        let mut topics: Vec<String> = Vec::new();
        for f in faqs.iter() {
            if !topics.contains(&f.topic) {
                topics.push(f.topic.clone());
            }
        }
        Ok(topics)
    }

    async fn search_faqs_by_keywords(&self, keywords: &[String]) -> Result<Vec<Faq>, StoreError> {
        if keywords.is_empty() {
            return Ok(Vec::new());
        }
        let hits: Vec<Faq> = self
            .faqs
            .read()
            .await
            .iter()
            .filter(|f| faq_matches(f, keywords))
            .cloned()
            .collect();
        debug!(keywords = keywords.len(), hits = hits.len(), "faq keyword search");
        Ok(hits)
    }

    async fn get_faqs_with_embeddings(&self) -> Result<Vec<Faq>, StoreError> {
        Ok(self
            .faqs
            .read()
            .await
            .iter()
            .filter(|f| f.embedding.is_some())
            .cloned()
            .collect())
    }

    async fn update_faq_embedding(&self, id: u64, embedding: Vec<f32>) -> Result<(), StoreError> {
        let mut faqs = self.faqs.write().await;
        check_dim_excluding(&faqs, Some(id), embedding.len())?;
        let faq = faqs
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(StoreError::FaqNotFound(id))?;
        faq.embedding = Some(embedding);
        Ok(())
    }

    async fn insert_faq(&self, faq: NewFaq) -> Result<Faq, StoreError> {
        let mut faqs = self.faqs.write().await;
        if let Some(e) = &faq.embedding {
            check_dim(&mut current_dim(&faqs), e.len())?;
        }
        let id = self.last_faq_id.fetch_add(1, Ordering::Relaxed) + 1;
        let stored = Faq {
            id,
            topic: faq.topic.trim().to_string(),
            question: faq.question.trim().to_string(),
            answer: faq.answer.trim().to_string(),
            keywords: normalize_keywords(&faq.keywords),
            embedding: faq.embedding,
        };
        faqs.push(stored.clone());
        info!(faq_id = id, "faq inserted");
        Ok(stored)
    }

    async fn replace_faq(
        &self,
        id: u64,
        patch: FaqPatch,
        embedding: Option<Vec<f32>>,
    ) -> Result<Faq, StoreError> {
        let mut faqs = self.faqs.write().await;
        if let Some(e) = &embedding {
            check_dim_excluding(&faqs, Some(id), e.len())?;
        }
        let slot = faqs
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(StoreError::FaqNotFound(id))?;
        let mut updated = patch.apply_to(slot);
        updated.embedding = embedding;
        *slot = updated.clone();
        info!(faq_id = id, embedded = updated.embedding.is_some(), "faq replaced");
        Ok(updated)
    }

    async fn delete_faq(&self, id: u64) -> Result<bool, StoreError> {
        let mut faqs = self.faqs.write().await;
        let before = faqs.len();
        faqs.retain(|f| f.id != id);
        let removed = faqs.len() != before;
        if removed {
            info!(faq_id = id, "faq deleted");
        }
        Ok(removed)
    }
}

impl CatalogStore for MemoryStore {
    async fn get_products(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.products.read().await.clone())
    }

    async fn get_products_by_category(&self, category: &str) -> Result<Vec<Product>, StoreError> {
        let category = category.trim().to_lowercase();
        Ok(self
            .products
            .read()
            .await
            .iter()
            .filter(|p| p.category.to_lowercase() == category)
            .cloned()
            .collect())
    }

    async fn search_products(&self, term: &str) -> Result<Vec<Product>, StoreError> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .products
            .read()
            .await
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&term)
                    || p.description.to_lowercase().contains(&term)
                    || p.category.to_lowercase().contains(&term)
            })
            .cloned()
            .collect())
    }

    async fn get_order_by_number(&self, order_number: &str) -> Result<Option<Order>, StoreError> {
        let wanted = order_number.trim().to_uppercase();
        Ok(self
            .orders
            .read()
            .await
            .iter()
            .find(|o| o.order_number.to_uppercase() == wanted)
            .cloned())
    }
}

impl MessageStore for MemoryStore {
    async fn create_message(&self, message: NewMessage) -> Result<Message, StoreError> {
        let mut messages = self.messages.write().await;
        let id = self.last_message_id.fetch_add(1, Ordering::Relaxed) + 1;
        let stored = Message {
            id,
            session_id: message.session_id,
            content: message.content,
            is_from_user: message.is_from_user,
            timestamp: chrono::Utc::now(),
        };
        messages.push(stored.clone());
        Ok(stored)
    }

    async fn get_messages_by_session(&self, session_id: &str) -> Result<Vec<Message>, StoreError> {
        Ok(self
            .messages
            .read()
            .await
            .iter()
            .filter(|m| m.session_id == session_id)
            .cloned()
            .collect())
    }

    async fn clear_session(&self, session_id: &str) -> Result<usize, StoreError> {
        let mut messages = self.messages.write().await;
        let before = messages.len();
        messages.retain(|m| m.session_id != session_id);
        let removed = before - messages.len();
        debug!(session_id, removed, "session cleared");
        Ok(removed)
    }
}
