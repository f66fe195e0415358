//! One chat turn: classify, branch, compose, persist.

use std::sync::Arc;

use serde::Serialize;
use support_store::{Message, NewMessage, Product, SupportStore};
use tracing::{debug, info};

use crate::compose::{MAX_PRODUCT_CARDS, Reply};
use crate::config::ChatConfig;
use crate::embed::EmbeddingsProvider;
use crate::errors::ChatError;
use crate::intent::{Classification, Intent, analyze};
use crate::retrieval::{FaqRetriever, RetrievalOutcome};

/// Result of [`ChatbotService::respond`].
#[derive(Clone, Debug)]
pub struct TurnOutcome {
    /// The persisted bot message.
    pub message: Message,
    pub intent: Intent,
    /// Set only for general questions.
    pub retrieval: Option<RetrievalOutcome>,
}

/// Decision for one message before anything is persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct TurnPlan {
    pub classification: Classification,
    pub reply: Reply,
    pub retrieval: Option<RetrievalOutcome>,
}

/// Short summary of a turn for logs and API responses.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnSummary {
    pub intent: Intent,
    pub reply: &'static str,
    pub retrieval_path: Option<&'static str>,
    pub fallback_reason: Option<&'static str>,
}

pub struct ChatbotService<S> {
    store: Arc<S>,
    provider: Arc<dyn EmbeddingsProvider>,
    retriever: FaqRetriever<S>,
    config: ChatConfig,
}

impl<S: SupportStore> ChatbotService<S> {
    pub fn new(store: Arc<S>, provider: Arc<dyn EmbeddingsProvider>, config: ChatConfig) -> Self {
        let retriever = FaqRetriever::new(
            store.clone(),
            provider.clone(),
            config.similarity_threshold,
            config.embedding_timeout,
        );
        Self {
            store,
            provider,
            retriever,
            config,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn provider(&self) -> &Arc<dyn EmbeddingsProvider> {
        &self.provider
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Stores and returns the greeting and the topic list for a new session.
    pub async fn welcome(&self, session_id: &str) -> Result<Vec<Message>, ChatError> {
        let topics = self.store.get_faq_topics().await?;
        let mut out = Vec::with_capacity(2);
        for reply in [Reply::Welcome, Reply::FaqTopics { topics }] {
            out.push(self.persist(session_id, reply).await?);
        }
        info!(session_id, "chat session started");
        Ok(out)
    }

    pub async fn record_user_message(
        &self,
        session_id: &str,
        text: &str,
    ) -> Result<Message, ChatError> {
        let msg = self
            .store
            .create_message(NewMessage::from_user(session_id, text))
            .await?;
        debug!(session_id, message_id = msg.id, "user message recorded");
        Ok(msg)
    }

    /// Stores bot-side text supplied by the client (e.g. a locally rendered reply).
    pub async fn record_bot_message(
        &self,
        session_id: &str,
        text: &str,
    ) -> Result<Message, ChatError> {
        let msg = self
            .store
            .create_message(NewMessage::from_bot(session_id, text))
            .await?;
        debug!(session_id, message_id = msg.id, "bot message recorded");
        Ok(msg)
    }

    /// Answers `text` and persists the bot message.
    pub async fn respond(&self, session_id: &str, text: &str) -> Result<TurnOutcome, ChatError> {
        let plan = self.plan(text).await?;
        let summary = plan.summary();
        info!(
            session_id,
            intent = %summary.intent,
            reply = summary.reply,
            retrieval = summary.retrieval_path.unwrap_or("-"),
            fallback = summary.fallback_reason.unwrap_or("-"),
            "chat turn handled"
        );

        let message = self.persist(session_id, plan.reply).await?;
        Ok(TurnOutcome {
            message,
            intent: plan.classification.intent,
            retrieval: plan.retrieval,
        })
    }

    /// Classifies `text` and picks the reply without writing anything.
    pub async fn plan(&self, text: &str) -> Result<TurnPlan, ChatError> {
        let classification = analyze(text);
        let mut retrieval = None;

        let reply = match classification.intent {
            Intent::OrderStatus => self.order_reply(classification.order_number.as_deref()).await?,
            Intent::ProductInquiry => self.product_reply(&classification.product_terms).await?,
            Intent::HumanSupport => Reply::HumanSupport,
            Intent::General => {
                let outcome = self.retriever.retrieve(text).await?;
                let reply = match outcome.answer() {
                    Some(answer) => Reply::FaqAnswer(answer.to_string()),
                    None => Reply::Fallback,
                };
                retrieval = Some(outcome);
                reply
            }
        };

        Ok(TurnPlan {
            classification,
            reply,
            retrieval,
        })
    }

    async fn order_reply(&self, order_number: Option<&str>) -> Result<Reply, ChatError> {
        let Some(number) = order_number else {
            return Ok(Reply::AskForOrderNumber);
        };
        match self.store.get_order_by_number(number).await? {
            Some(order) => Ok(Reply::order(&order)),
            None => {
                debug!(order_number = number, "order not found");
                Ok(Reply::OrderNotFound {
                    order_number: number.to_string(),
                })
            }
        }
    }

    /// Searches every term, dedupes by id, and falls back to featured
    /// products when nothing matched.
    async fn product_reply(&self, terms: &[&str]) -> Result<Reply, ChatError> {
        let mut found: Vec<Product> = Vec::new();
        for term in terms {
            for p in self.store.search_products(term).await? {
                if !found.iter().any(|f| f.id == p.id) {
                    found.push(p);
                }
            }
        }

        if found.is_empty() {
            debug!(terms = terms.len(), "no product matches, showing featured");
            found = self
                .store
                .get_products()
                .await?
                .into_iter()
                .filter(Product::is_featured)
                .take(MAX_PRODUCT_CARDS)
                .collect();
        }

        Ok(Reply::products(&found))
    }

    async fn persist(&self, session_id: &str, reply: Reply) -> Result<Message, ChatError> {
        let content = reply.into_content().encode()?;
        let msg = self
            .store
            .create_message(NewMessage::from_bot(session_id, content))
            .await?;
        Ok(msg)
    }
}

impl TurnPlan {
    pub fn summary(&self) -> TurnSummary {
        TurnSummary {
            intent: self.classification.intent,
            reply: self.reply.kind(),
            retrieval_path: self.retrieval.as_ref().map(RetrievalOutcome::path),
            fallback_reason: self
                .retrieval
                .as_ref()
                .and_then(RetrievalOutcome::fallback_reason)
                .map(|r| r.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::{
        FALLBACK_TEXT, MessageContent, NO_PRODUCTS_TEXT, Payload, WELCOME_TEXT,
    };
    use crate::embed::NoopEmbedder;
    use crate::retrieval::FallbackReason;
    use crate::testing::FixedEmbedder;
    use support_store::{FaqStore, MemoryStore, MessageStore, SeedData};

    fn seeded() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::from_seed(SeedData::builtin().unwrap()).unwrap())
    }

    fn service(store: Arc<MemoryStore>, provider: Arc<dyn EmbeddingsProvider>) -> ChatbotService<MemoryStore> {
        ChatbotService::new(store, provider, ChatConfig::default())
    }

    fn payload(msg: &Message) -> Payload {
        match MessageContent::decode(&msg.content) {
            MessageContent::Payload(p) => p,
            MessageContent::Text(t) => panic!("expected payload, got text: {t}"),
        }
    }

    #[tokio::test]
    async fn welcome_stores_greeting_and_topics() {
        let store = seeded();
        let bot = service(store.clone(), Arc::new(NoopEmbedder));

        let msgs = bot.welcome("s-1").await.unwrap();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].content, WELCOME_TEXT);
        match payload(&msgs[1]) {
            Payload::FaqTopics { topics, .. } => assert_eq!(topics.len(), 5),
            other => panic!("unexpected {other:?}"),
        }
        assert!(msgs.iter().all(|m| !m.is_from_user));
        assert_eq!(store.get_messages_by_session("s-1").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn shipped_order_reports_shipped_template() {
        let bot = service(seeded(), Arc::new(NoopEmbedder));
        let out = bot.respond("s-1", "Where is my order #NK123456?").await.unwrap();

        assert_eq!(out.intent, Intent::OrderStatus);
        assert!(out.retrieval.is_none());
        assert!(!out.message.is_from_user);
        match payload(&out.message) {
            Payload::OrderStatus(p) => {
                assert_eq!(p.order_number, "NK123456");
                assert_eq!(p.status, "Shipped");
                assert!(p.message.contains("on its way"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_order_is_not_found_text() {
        let bot = service(seeded(), Arc::new(NoopEmbedder));
        let out = bot.respond("s-1", "track order 999999").await.unwrap();
        assert!(out.message.content.contains("NK999999"));
        assert!(out.message.content.starts_with("I couldn't find an order"));
    }

    #[tokio::test]
    async fn product_terms_are_searched_and_capped() {
        let bot = service(seeded(), Arc::new(NoopEmbedder));
        let out = bot.respond("s-1", "Do you sell wintergreen pouches?").await.unwrap();
        assert_eq!(out.intent, Intent::ProductInquiry);
        match payload(&out.message) {
            Payload::ProductInfo { products, .. } => {
                assert_eq!(products.len(), 3);
                let mut names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
                names.dedup();
                assert_eq!(names.len(), 3);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn product_inquiry_without_terms_shows_featured() {
        let bot = service(seeded(), Arc::new(NoopEmbedder));
        let out = bot.respond("s-1", "What would you recommend?").await.unwrap();
        match payload(&out.message) {
            Payload::ProductInfo { products, .. } => {
                let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
                assert_eq!(
                    names,
                    vec!["Zyn Cool Mint 6mg", "On! Wintergreen 8mg", "VELO Citrus 4mg"]
                );
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_catalog_gives_no_products_text() {
        let bot = service(Arc::new(MemoryStore::new()), Arc::new(NoopEmbedder));
        let out = bot.respond("s-1", "recommend a product").await.unwrap();
        assert_eq!(out.message.content, NO_PRODUCTS_TEXT);
    }

    #[tokio::test]
    async fn human_request_gets_handoff_payload() {
        let bot = service(seeded(), Arc::new(NoopEmbedder));
        let out = bot.respond("s-1", "I want to talk to a real person").await.unwrap();
        assert_eq!(out.intent, Intent::HumanSupport);
        match payload(&out.message) {
            Payload::HumanSupport { wait_time, .. } => assert_eq!(wait_time, "2-3 minutes"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn general_question_uses_lexical_fallback_without_provider() {
        let store = seeded();
        let bot = service(store.clone(), Arc::new(NoopEmbedder));
        let out = bot.respond("s-1", "Tell me about your return policy").await.unwrap();

        assert_eq!(out.intent, Intent::General);
        let retrieval = out.retrieval.unwrap();
        assert_eq!(retrieval.path(), "lexical");
        assert_eq!(
            retrieval.fallback_reason(),
            Some(&FallbackReason::ProviderUnavailable)
        );
        let faq = store.get_faq(5).await.unwrap().unwrap();
        assert_eq!(out.message.content, faq.answer);
    }

    #[tokio::test]
    async fn general_question_uses_semantic_match_when_available() {
        let store = seeded();
        store.update_faq_embedding(1, vec![1.0, 0.0]).await.unwrap();
        store.update_faq_embedding(5, vec![0.0, 1.0]).await.unwrap();
        let provider = Arc::new(FixedEmbedder::new(vec![0.05, 1.0]));
        let bot = service(store.clone(), provider.clone());

        let out = bot.respond("s-1", "Can I send stuff back?").await.unwrap();
        assert_eq!(out.retrieval.as_ref().map(RetrievalOutcome::path), Some("semantic"));
        assert_eq!(
            out.message.content,
            store.get_faq(5).await.unwrap().unwrap().answer
        );
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn unmatched_question_gets_fallback_text() {
        let bot = service(seeded(), Arc::new(NoopEmbedder));
        let out = bot.respond("s-1", "blorp zzz").await.unwrap();
        assert_eq!(out.message.content, FALLBACK_TEXT);
        assert!(matches!(
            out.retrieval,
            Some(RetrievalOutcome::NoMatch { .. })
        ));
    }

    #[tokio::test]
    async fn planning_is_idempotent_and_writes_nothing() {
        let store = seeded();
        let bot = service(store.clone(), Arc::new(NoopEmbedder));
        for text in [
            "What is your return policy?",
            "Where is my order #NK234567?",
            "any zyn?",
        ] {
            let a = bot.plan(text).await.unwrap();
            let b = bot.plan(text).await.unwrap();
            assert_eq!(a, b, "{text}");
        }
        assert_eq!(store.counts().await.messages, 0);
    }

    #[tokio::test]
    async fn user_messages_are_recorded() {
        let store = seeded();
        let bot = service(store.clone(), Arc::new(NoopEmbedder));
        let m = bot.record_user_message("s-9", "hi").await.unwrap();
        assert!(m.is_from_user);
        let b = bot.record_bot_message("s-9", "hello").await.unwrap();
        assert!(!b.is_from_user);
        assert_eq!(store.get_messages_by_session("s-9").await.unwrap(), vec![m, b]);
    }
}
