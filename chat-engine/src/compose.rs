//! Reply composition and the wire format of bot message content.
//!
//! A bot message's `content` is either plain text or a JSON object whose
//! `type` field is one of `faq-topics`, `order-status`, `human-support`,
//! `product-info`. Those names are read by the chat widget.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use support_store::{Order, OrderStatus, Product};

pub const WELCOME_TEXT: &str =
    "Welcome to Nicokick! I'm your virtual assistant. How can I help you today?";
pub const TOPICS_TEXT: &str = "Here are some topics I can help with:";
pub const ASK_FOR_ORDER_NUMBER_TEXT: &str = "I'd be happy to help you check your order status. Could you please provide your order number? You can find it in your order confirmation email.";
pub const NO_PRODUCTS_TEXT: &str = "I'm sorry, I couldn't find specific products matching your request. Please try a different search term or browse our product categories on our website.";
pub const PRODUCT_INFO_TEXT: &str = "Here are some products that might interest you:";
pub const PRODUCT_INFO_CONCLUSION: &str = "Would you like specific information about any of these products or would you like to see more options?";
pub const HUMAN_SUPPORT_TEXT: &str = "I understand you'd like to speak with a human customer service representative. I'd be happy to connect you.";
pub const HUMAN_SUPPORT_WAIT_TIME: &str = "2-3 minutes";
pub const FALLBACK_TEXT: &str =
    "I'm not sure I understand. Could you rephrase your question or select one of the topics above?";

/// Products shown in one product-info reply.
pub const MAX_PRODUCT_CARDS: usize = 3;

/// Status line shown under the order details.
pub fn order_status_message(status: &OrderStatus) -> &'static str {
    match status {
        OrderStatus::Processing => {
            "Your order is being processed. We'll update you once it ships. Is there anything else I can help you with?"
        }
        OrderStatus::Shipped => {
            "Your order has been shipped and is on its way! You can track it using the number above. Is there anything else I can help you with?"
        }
        OrderStatus::Delivered => {
            "Great news! Your order has been delivered. If you have any issues with your products, please let us know. Is there anything else I can help you with?"
        }
        OrderStatus::Cancelled => {
            "This order has been cancelled. If you didn't request this cancellation or have questions, please contact our customer support. Is there anything else I can help you with?"
        }
        OrderStatus::Other(_) => {
            "Your order status is updated above. Is there anything else I can help you with?"
        }
    }
}

pub fn order_not_found_text(order_number: &str) -> String {
    format!(
        "I couldn't find an order with the number {order_number}. Please double-check the order number and try again, or contact our customer support for assistance."
    )
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusPayload {
    pub order_number: String,
    pub status: String,
    pub shipping_method: Option<String>,
    pub estimated_delivery: Option<String>,
    pub tracking_number: Option<String>,
    pub message: String,
}

impl OrderStatusPayload {
    pub fn from_order(order: &Order) -> Self {
        Self {
            order_number: order.order_number.clone(),
            status: order.status.to_string(),
            shipping_method: order.shipping_method.clone(),
            estimated_delivery: order.estimated_delivery.clone(),
            tracking_number: order.tracking_number.clone(),
            message: order_status_message(&order.status).to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductCard {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub details: Map<String, Value>,
}

impl From<&Product> for ProductCard {
    fn from(p: &Product) -> Self {
        Self {
            name: p.name.clone(),
            description: p.description.clone(),
            details: p.details.clone(),
        }
    }
}

/// Structured message content, tagged by `type`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Payload {
    FaqTopics {
        text: String,
        topics: Vec<String>,
    },
    OrderStatus(OrderStatusPayload),
    HumanSupport {
        text: String,
        #[serde(rename = "waitTime")]
        wait_time: String,
    },
    ProductInfo {
        text: String,
        products: Vec<ProductCard>,
        conclusion: String,
    },
}

impl Payload {
    /// Wire discriminant.
    pub fn type_name(&self) -> &'static str {
        match self {
            Payload::FaqTopics { .. } => "faq-topics",
            Payload::OrderStatus(_) => "order-status",
            Payload::HumanSupport { .. } => "human-support",
            Payload::ProductInfo { .. } => "product-info",
        }
    }
}

/// What ends up in `Message.content`.
#[derive(Clone, Debug, PartialEq)]
pub enum MessageContent {
    Text(String),
    Payload(Payload),
}

impl MessageContent {
    /// Plain text as is, payloads as JSON.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        match self {
            MessageContent::Text(t) => Ok(t.clone()),
            MessageContent::Payload(p) => serde_json::to_string(p),
        }
    }

    /// A JSON object with a known `type` becomes a payload; anything else is text.
    pub fn decode(raw: &str) -> Self {
        if raw.trim_start().starts_with('{') {
            if let Ok(p) = serde_json::from_str::<Payload>(raw) {
                return MessageContent::Payload(p);
            }
        }
        MessageContent::Text(raw.to_string())
    }
}

/// Every reply the bot can give.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    Welcome,
    FaqTopics { topics: Vec<String> },
    FaqAnswer(String),
    OrderStatus(OrderStatusPayload),
    OrderNotFound { order_number: String },
    AskForOrderNumber,
    ProductInfo { products: Vec<ProductCard> },
    NoProductsFound,
    HumanSupport,
    Fallback,
}

impl Reply {
    pub fn order(order: &Order) -> Self {
        Reply::OrderStatus(OrderStatusPayload::from_order(order))
    }

    /// Up to [`MAX_PRODUCT_CARDS`] products, or `NoProductsFound` for none.
    pub fn products(products: &[Product]) -> Self {
        if products.is_empty() {
            return Reply::NoProductsFound;
        }
        Reply::ProductInfo {
            products: products
                .iter()
                .take(MAX_PRODUCT_CARDS)
                .map(ProductCard::from)
                .collect(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Reply::Welcome => "welcome",
            Reply::FaqTopics { .. } => "faq-topics",
            Reply::FaqAnswer(_) => "faq-answer",
            Reply::OrderStatus(_) => "order-status",
            Reply::OrderNotFound { .. } => "order-not-found",
            Reply::AskForOrderNumber => "ask-for-order-number",
            Reply::ProductInfo { .. } => "product-info",
            Reply::NoProductsFound => "no-products-found",
            Reply::HumanSupport => "human-support",
            Reply::Fallback => "fallback",
        }
    }

    pub fn into_content(self) -> MessageContent {
        match self {
            Reply::Welcome => MessageContent::Text(WELCOME_TEXT.into()),
            Reply::FaqTopics { topics } => MessageContent::Payload(Payload::FaqTopics {
                text: TOPICS_TEXT.into(),
                topics,
            }),
            Reply::FaqAnswer(answer) => MessageContent::Text(answer),
            Reply::OrderStatus(p) => MessageContent::Payload(Payload::OrderStatus(p)),
            Reply::OrderNotFound { order_number } => {
                MessageContent::Text(order_not_found_text(&order_number))
            }
            Reply::AskForOrderNumber => MessageContent::Text(ASK_FOR_ORDER_NUMBER_TEXT.into()),
            Reply::ProductInfo { products } => MessageContent::Payload(Payload::ProductInfo {
                text: PRODUCT_INFO_TEXT.into(),
                products,
                conclusion: PRODUCT_INFO_CONCLUSION.into(),
            }),
            Reply::NoProductsFound => MessageContent::Text(NO_PRODUCTS_TEXT.into()),
            Reply::HumanSupport => MessageContent::Payload(Payload::HumanSupport {
                text: HUMAN_SUPPORT_TEXT.into(),
                wait_time: HUMAN_SUPPORT_WAIT_TIME.into(),
            }),
            Reply::Fallback => MessageContent::Text(FALLBACK_TEXT.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order(status: &str) -> Order {
        serde_json::from_value(json!({
            "orderNumber": "NK123456",
            "status": status,
            "shippingMethod": "USPS Priority",
            "estimatedDelivery": "June 15, 2023",
            "trackingNumber": "9405511202555647XXXXX"
        }))
        .unwrap()
    }

    #[test]
    fn status_templates_ignore_case() {
        let p = OrderStatusPayload::from_order(&order("shipped"));
        assert!(p.message.contains("on its way"));
        assert_eq!(p.status, "Shipped");

        assert!(order_status_message(&OrderStatus::parse("PROCESSING")).contains("being processed"));
        assert!(order_status_message(&OrderStatus::Delivered).contains("has been delivered"));
        assert!(order_status_message(&OrderStatus::Cancelled).contains("has been cancelled"));
        assert!(order_status_message(&OrderStatus::parse("On Hold")).contains("updated above"));
    }

    #[test]
    fn order_status_wire_shape() {
        let content = Reply::order(&order("Shipped")).into_content();
        let v: Value = serde_json::from_str(&content.encode().unwrap()).unwrap();
        assert_eq!(v["type"], "order-status");
        assert_eq!(v["orderNumber"], "NK123456");
        assert_eq!(v["shippingMethod"], "USPS Priority");
        assert_eq!(v["trackingNumber"], "9405511202555647XXXXX");
        assert!(v["message"].as_str().unwrap().contains("on its way"));
    }

    #[test]
    fn payload_discriminants_are_verbatim() {
        let topics = Reply::FaqTopics {
            topics: vec!["Shipping Policy".into()],
        };
        let human = Reply::HumanSupport;
        let products = Reply::ProductInfo { products: vec![] };
        for (reply, tag) in [
            (topics, "faq-topics"),
            (human, "human-support"),
            (products, "product-info"),
        ] {
            let MessageContent::Payload(p) = reply.into_content() else {
                panic!("expected payload for {tag}");
            };
            assert_eq!(p.type_name(), tag);
            let v = serde_json::to_value(&p).unwrap();
            assert_eq!(v["type"], tag);
        }
    }

    #[test]
    fn human_support_uses_wait_time_field() {
        let v: Value =
            serde_json::from_str(&Reply::HumanSupport.into_content().encode().unwrap()).unwrap();
        assert_eq!(v["waitTime"], "2-3 minutes");
        assert_eq!(v["text"], HUMAN_SUPPORT_TEXT);
    }

    #[test]
    fn plain_text_variants() {
        assert_eq!(
            Reply::OrderNotFound {
                order_number: "NK000001".into()
            }
            .into_content(),
            MessageContent::Text(
                "I couldn't find an order with the number NK000001. Please double-check the order number and try again, or contact our customer support for assistance.".into()
            )
        );
        assert_eq!(
            Reply::Fallback.into_content().encode().unwrap(),
            FALLBACK_TEXT
        );
        assert_eq!(
            Reply::FaqAnswer("42".into()).into_content(),
            MessageContent::Text("42".into())
        );
    }

    #[test]
    fn products_cap_at_three_and_empty_is_no_products() {
        let mk = |name: &str| -> Product {
            serde_json::from_value(json!({"name": name, "description": "d", "category": "c"})).unwrap()
        };
        let many: Vec<Product> = ["a", "b", "c", "d"].iter().map(|n| mk(n)).collect();
        match Reply::products(&many) {
            Reply::ProductInfo { products } => assert_eq!(products.len(), 3),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(Reply::products(&[]), Reply::NoProductsFound);
    }

    #[test]
    fn decode_recognizes_payloads_only() {
        let encoded = Reply::HumanSupport.into_content().encode().unwrap();
        assert!(matches!(
            MessageContent::decode(&encoded),
            MessageContent::Payload(Payload::HumanSupport { .. })
        ));
        assert_eq!(
            MessageContent::decode(r#"{"type":"weather"}"#),
            MessageContent::Text(r#"{"type":"weather"}"#.into())
        );
        assert_eq!(
            MessageContent::decode("hello"),
            MessageContent::Text("hello".into())
        );
    }
}
