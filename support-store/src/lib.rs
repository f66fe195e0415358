//! Data model and storage for the support chat: messages, FAQs, products
//! and orders, the async store contracts and an in-memory implementation.

pub mod errors;
pub mod memory;
pub mod record;
pub mod seed;
pub mod store;

pub use errors::StoreError;
pub use memory::{MemoryStore, StoreCounts};
pub use record::{
    Faq, FaqPatch, Message, NewFaq, NewMessage, Order, OrderItem, OrderStatus, Product,
    embedding_text, normalize_keywords,
};
pub use seed::SeedData;
pub use store::{CatalogStore, FaqStore, MessageStore, SupportStore};
