use std::sync::Arc;

use ai_embedding_service::HealthStatus;
use axum::{Json, extract::State};
use serde::Serialize;
use support_store::StoreCounts;
use tracing::instrument;

use crate::core::app_state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    /// Name of the active embeddings provider (`noop` when disabled).
    pub provider: String,
    pub embedding: HealthStatus,
    pub store: StoreCounts,
}

/// Handler: GET /api/health
///
/// Always 200; a failing embedding probe only degrades FAQ retrieval to
/// keyword matching.
#[instrument(skip_all)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let embedding = match (&state.health, &state.embedding) {
        (Some(svc), Some(cfg)) => svc.check(cfg).await,
        _ => HealthStatus::disabled(),
    };

    Json(HealthResponse {
        status: "ok",
        provider: state.chatbot.provider().name().to_string(),
        embedding,
        store: state.store.counts().await,
    })
}
