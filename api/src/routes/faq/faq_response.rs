use serde::{Deserialize, Serialize};
use support_store::Faq;

/// FAQ as returned by the API; the embedding vector itself stays internal.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqView {
    pub id: u64,
    pub topic: String,
    pub question: String,
    pub answer: String,
    pub keywords: Vec<String>,
    pub has_embedding: bool,
}

impl From<Faq> for FaqView {
    fn from(faq: Faq) -> Self {
        Self {
            has_embedding: faq.embedding.is_some(),
            id: faq.id,
            topic: faq.topic,
            question: faq.question,
            answer: faq.answer,
            keywords: faq.keywords,
        }
    }
}

/// `?query=` of the search routes.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

impl SearchQuery {
    /// Non-blank query text.
    pub fn text(&self) -> Option<&str> {
        self.query.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

/// Whitespace-separated words longer than two characters.
pub fn search_keywords(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .filter(|w| w.chars().count() > 2)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_words_are_dropped() {
        assert_eq!(search_keywords("  do I ship to  Canada "), vec!["ship", "Canada"]);
        assert!(search_keywords("a an to").is_empty());
    }

    #[test]
    fn blank_query_has_no_text() {
        let q = SearchQuery {
            query: Some("   ".into()),
        };
        assert_eq!(q.text(), None);
        assert_eq!(SearchQuery::default().text(), None);
    }
}
