//! Lexical analysis of user messages: tokens, order numbers, product terms.
//!
//! Everything here is pure and deterministic. Vocabulary matching is
//! case-insensitive substring containment, not token equality, so
//! multi-word entries such as `"nicotine pouches"` match as written.

use std::sync::OnceLock;

use regex::Regex;

/// Two-letter prefix of every storefront order number.
pub const ORDER_PREFIX: &str = "NK";

/// Tokens shorter than this are dropped.
pub const MIN_TOKEN_LEN: usize = 3;

pub const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "is", "are", "was", "were", "be", "been", "being", "in",
    "on", "at", "to", "for", "with", "by", "about", "like", "through", "over", "before", "after",
    "between", "under", "above", "i", "you", "he", "she", "it", "we", "they", "me", "him", "her",
    "us", "them", "my", "your", "his", "its", "our", "their", "can", "could", "will", "would",
    "shall", "should", "may", "might", "must", "have", "has", "had", "do", "does", "did", "am",
];

/// Product and category names looked up in the catalog.
pub const PRODUCT_TERMS: &[&str] = &[
    "nicotine pouches",
    "pouches",
    "lozenges",
    "gum",
    "mint",
    "tobacco-free",
    "zyn",
    "on!",
    "velo",
    "rogue",
    "lucy",
    "lyft",
    "wintergreen",
    "citrus",
];

/// ASCII letters and digits only; `\d` and `(?i)` would admit other scripts.
fn order_number_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#?([A-Za-z]{0,2}[0-9]{5,10})").ok())
        .as_ref()
}

fn punctuation_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s]").ok()).as_ref()
}

/// Lowercases, strips punctuation, splits on whitespace and drops stop
/// words and short tokens. Duplicates are removed; first occurrence wins.
///
/// ```
/// use chat_engine::lexical::tokenize;
/// assert_eq!(tokenize("What is your RETURN policy? Return!"), vec!["what", "return", "policy"]);
/// ```
pub fn tokenize(message: &str) -> Vec<String> {
    let lowered = message.to_lowercase();
    let cleaned = match punctuation_re() {
        Some(re) => re.replace_all(&lowered, ""),
        None => lowered.as_str().into(),
    };

    let mut out: Vec<String> = Vec::new();
    for word in cleaned.split_whitespace() {
        if word.chars().count() < MIN_TOKEN_LEN || STOP_WORDS.contains(&word) {
            continue;
        }
        if !out.iter().any(|w| w == word) {
            out.push(word.to_string());
        }
    }
    out
}

/// Finds an order number (optional `#`, up to two letters, 5 to 10 digits)
/// and normalizes it to uppercase with the `NK` prefix.
///
/// ```
/// use chat_engine::lexical::extract_order_number;
/// assert_eq!(extract_order_number("my order #123456").as_deref(), Some("NK123456"));
/// assert_eq!(extract_order_number("NK998877 status").as_deref(), Some("NK998877"));
/// assert_eq!(extract_order_number("hello"), None);
/// ```
pub fn extract_order_number(message: &str) -> Option<String> {
    let caps = order_number_re()?.captures(message)?;
    let code = caps.get(1)?.as_str().to_uppercase();
    if code.starts_with(ORDER_PREFIX) {
        Some(code)
    } else {
        Some(format!("{ORDER_PREFIX}{code}"))
    }
}

/// Entries of [`PRODUCT_TERMS`] contained in the message, in vocabulary order.
pub fn extract_product_terms(message: &str) -> Vec<&'static str> {
    let lowered = message.to_lowercase();
    PRODUCT_TERMS
        .iter()
        .copied()
        .filter(|t| lowered.contains(t))
        .collect()
}

/// `true` when any vocabulary entry is a substring of the lowercased message.
pub fn contains_any(message: &str, vocabulary: &[&str]) -> bool {
    let lowered = message.to_lowercase();
    vocabulary.iter().any(|t| lowered.contains(&t.to_lowercase()))
}
