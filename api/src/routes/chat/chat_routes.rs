//! Chat session routes.
//!
//! The client posts the user's text to `/api/chat/message` and then asks
//! `/api/chat/response` for the bot reply; both are persisted per session.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use support_store::{Message, MessageStore};
use tracing::{info, instrument};

use crate::{
    core::app_state::AppState,
    error_handler::AppResult,
    routes::chat::chat_request::{
        BotResponseRequest, ClearResponse, SendMessageRequest, SessionRequest, required,
    },
};

const SESSION_REQUIRED: &str = "Session ID is required";

/// Handler: POST /api/chat/init
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:3000/api/chat/init \
///   -H 'content-type: application/json' \
///   -d '{"sessionId":"s-1"}'
/// ```
#[instrument(skip_all)]
pub async fn init_chat(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SessionRequest>, JsonRejection>,
) -> AppResult<Json<Vec<Message>>> {
    let Json(body) = body?;
    let session_id = required(&body.session_id, SESSION_REQUIRED)?;
    Ok(Json(state.chatbot.welcome(session_id).await?))
}

/// Handler: POST /api/chat/message
#[instrument(skip_all)]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SendMessageRequest>, JsonRejection>,
) -> AppResult<Json<Message>> {
    let Json(body) = body?;
    let session_id = required(&body.session_id, SESSION_REQUIRED)?;
    let content = required(&body.content, "Message content is required")?;

    let message = if body.is_user {
        state.chatbot.record_user_message(session_id, content).await?
    } else {
        state.chatbot.record_bot_message(session_id, content).await?
    };
    Ok(Json(message))
}

/// Handler: POST /api/chat/response
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:3000/api/chat/response \
///   -H 'content-type: application/json' \
///   -d '{"sessionId":"s-1","userMessage":"Where is my order NK123456?"}'
/// ```
#[instrument(skip_all)]
pub async fn bot_response(
    State(state): State<Arc<AppState>>,
    body: Result<Json<BotResponseRequest>, JsonRejection>,
) -> AppResult<Json<Message>> {
    let Json(body) = body?;
    let message = "Session ID and user message are required";
    let session_id = required(&body.session_id, message)?;
    let user_message = required(&body.user_message, message)?;

    let outcome = state.chatbot.respond(session_id, user_message).await?;
    Ok(Json(outcome.message))
}

/// Handler: POST /api/chat/clear
#[instrument(skip_all)]
pub async fn clear_chat(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SessionRequest>, JsonRejection>,
) -> AppResult<Json<ClearResponse>> {
    let Json(body) = body?;
    let session_id = required(&body.session_id, SESSION_REQUIRED)?;

    let removed = state.store.clear_session(session_id).await?;
    info!(session_id, removed, "chat history cleared");
    Ok(Json(ClearResponse {
        message: "Chat history cleared",
        removed,
    }))
}

/// Handler: GET /api/chat/history/{session_id}
#[instrument(skip(state))]
pub async fn chat_history(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> AppResult<Json<Vec<Message>>> {
    Ok(Json(state.store.get_messages_by_session(&session_id).await?))
}
