//! Core data models shared by the store, the chat engine and the API.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// A single chat turn. `content` is plain text or a serialized payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: u64,
    pub session_id: String,
    pub content: String,
    #[serde(rename = "isUser")]
    pub is_from_user: bool,
    pub timestamp: DateTime<Utc>,
}

/// Insert form of [`Message`]; id and timestamp are assigned by the store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    pub session_id: String,
    pub content: String,
    #[serde(rename = "isUser")]
    pub is_from_user: bool,
}

impl NewMessage {
    pub fn from_user(session_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            content: content.into(),
            is_from_user: true,
        }
    }

    pub fn from_bot(session_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            content: content.into(),
            is_from_user: false,
        }
    }
}

/// Stored question/answer with keywords and an optional embedding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    pub id: u64,
    pub topic: String,
    pub question: String,
    pub answer: String,
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl Faq {
    /// Text used to compute the FAQ embedding: question plus keywords.
    pub fn embedding_text(&self) -> String {
        embedding_text(&self.question, &self.keywords)
    }
}

/// `"{question} {keyword keyword ...}"`.
pub fn embedding_text(question: &str, keywords: &[String]) -> String {
    if keywords.is_empty() {
        question.to_string()
    } else {
        format!("{question} {}", keywords.join(" "))
    }
}

/// Insert form of [`Faq`]. Also the shape of seed records.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFaq {
    pub topic: String,
    pub question: String,
    pub answer: String,
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

/// Partial update of an FAQ. `None` keeps the current value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqPatch {
    pub topic: Option<String>,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub keywords: Option<Vec<String>>,
}

impl FaqPatch {
    /// Returns the FAQ as it would look after the patch, embedding untouched.
    pub fn apply_to(&self, faq: &Faq) -> Faq {
        let pick = |new: &Option<String>, old: &str| match new {
            Some(v) if !v.trim().is_empty() => v.trim().to_string(),
            _ => old.to_string(),
        };
        Faq {
            id: faq.id,
            topic: pick(&self.topic, &faq.topic),
            question: pick(&self.question, &faq.question),
            answer: pick(&self.answer, &faq.answer),
            keywords: match &self.keywords {
                Some(k) if !k.is_empty() => normalize_keywords(k),
                _ => faq.keywords.clone(),
            },
            embedding: faq.embedding.clone(),
        }
    }
}

/// Trims, lowercases and deduplicates keywords, keeping first-seen order.
pub fn normalize_keywords<S: AsRef<str>>(keywords: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(keywords.len());
    for k in keywords {
        let k = k.as_ref().trim().to_lowercase();
        if !k.is_empty() && !out.contains(&k) {
            out.push(k);
        }
    }
    out
}

/// Catalog entry. `details` is free-form (strengths, flavors, flags).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub details: Map<String, Value>,
}

impl Product {
    /// `details.bestSeller || details.newProduct`.
    pub fn is_featured(&self) -> bool {
        let flag = |k: &str| self.details.get(k).and_then(Value::as_bool).unwrap_or(false);
        flag("bestSeller") || flag("newProduct")
    }
}

/// Fulfilment state of an order; unknown values are kept verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OrderStatus {
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Other(String),
}

impl OrderStatus {
    /// Case-insensitive parse; anything unknown becomes `Other`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "processing" => Self::Processing,
            "shipped" => Self::Shipped,
            "delivered" => Self::Delivered,
            "cancelled" | "canceled" => Self::Cancelled,
            _ => Self::Other(s.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Ok(Self::parse(&s))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: u64,
    pub name: String,
    pub quantity: u32,
    pub price: f64,
}

/// Customer order; read-only for the chat engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default)]
    pub id: u64,
    pub order_number: String,
    pub status: OrderStatus,
    #[serde(default)]
    pub shipping_method: Option<String>,
    #[serde(default)]
    pub estimated_delivery: Option<String>,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default = "chrono::Utc::now")]
    pub created_at: DateTime<Utc>,
}
