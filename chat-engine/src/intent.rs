//! Rule-based intent classification.
//!
//! Rules are checked in a fixed order and the first match wins:
//! order status (needs an order number), product inquiry, human support,
//! then general.

use serde::Serialize;

use crate::lexical::{contains_any, extract_order_number, extract_product_terms};

pub const ORDER_VOCABULARY: &[&str] = &[
    "order",
    "status",
    "track",
    "package",
    "tracking",
    "shipping",
    "delivery",
    "shipped",
    "arrive",
    "when",
    "where is",
    "check order",
];

pub const PRODUCT_VOCABULARY: &[&str] = &[
    "product",
    "nicotine",
    "pouches",
    "lozenges",
    "gum",
    "zyn",
    "on!",
    "velo",
    "rogue",
    "lucy",
    "lyft",
    "mint",
    "wintergreen",
    "buy",
    "purchase",
    "recommend",
];

pub const HUMAN_VOCABULARY: &[&str] = &[
    "human",
    "agent",
    "person",
    "representative",
    "support",
    "service",
    "speak to someone",
    "talk to someone",
    "real person",
    "real human",
    "customer service",
    "help desk",
    "call",
    "assistance",
    "connect me",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Intent {
    OrderStatus,
    ProductInquiry,
    HumanSupport,
    General,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::OrderStatus => "order-status",
            Intent::ProductInquiry => "product-inquiry",
            Intent::HumanSupport => "human-support",
            Intent::General => "general",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Intent plus the entities extracted while deciding it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classification {
    pub intent: Intent,
    pub order_number: Option<String>,
    pub product_terms: Vec<&'static str>,
}

/// Classifies `message` and keeps the extracted entities.
pub fn analyze(message: &str) -> Classification {
    let order_number = extract_order_number(message);
    let product_terms = extract_product_terms(message);

    let intent = if order_number.is_some() && contains_any(message, ORDER_VOCABULARY) {
        Intent::OrderStatus
    } else if contains_any(message, PRODUCT_VOCABULARY) {
        Intent::ProductInquiry
    } else if contains_any(message, HUMAN_VOCABULARY) {
        Intent::HumanSupport
    } else {
        Intent::General
    };

    Classification {
        intent,
        order_number,
        product_terms,
    }
}

pub fn classify(message: &str) -> Intent {
    analyze(message).intent
}
