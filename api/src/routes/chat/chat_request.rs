use serde::{Deserialize, Serialize};

use crate::error_handler::AppError;

/// Body of `/api/chat/init` and `/api/chat/clear`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    #[serde(default)]
    pub session_id: String,
}

/// Body of `/api/chat/message`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub content: String,
    pub is_user: bool,
}

/// Body of `/api/chat/response`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotResponseRequest {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub user_message: String,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub message: &'static str,
    pub removed: usize,
}

/// Trimmed value of a required text field, or a 400.
pub fn required<'a>(value: &'a str, message: &str) -> Result<&'a str, AppError> {
    let value = value.trim();
    if value.is_empty() {
        Err(AppError::BadRequest(message.to_string()))
    } else {
        Ok(value)
    }
}
