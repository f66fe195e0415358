use serde::Deserialize;
use support_store::{FaqPatch, NewFaq};

/// Request payload for `POST /api/admin/faqs`.
///
/// Missing fields deserialize empty and are rejected by FAQ validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFaqRequest {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl From<CreateFaqRequest> for NewFaq {
    fn from(req: CreateFaqRequest) -> Self {
        NewFaq {
            topic: req.topic,
            question: req.question,
            answer: req.answer,
            keywords: req.keywords,
            embedding: None,
        }
    }
}

/// Request payload for `PUT /api/admin/faqs/{id}`; absent fields are kept.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFaqRequest {
    pub topic: Option<String>,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub keywords: Option<Vec<String>>,
}

impl From<UpdateFaqRequest> for FaqPatch {
    fn from(req: UpdateFaqRequest) -> Self {
        FaqPatch {
            topic: req.topic,
            question: req.question,
            answer: req.answer,
            keywords: req.keywords,
        }
    }
}
