use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use support_store::FaqStore;
use tracing::{debug, instrument};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::faq::faq_response::{FaqView, SearchQuery, search_keywords},
};

/// Handler: GET /api/faq/topics
#[instrument(skip_all)]
pub async fn faq_topics(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<String>>> {
    Ok(Json(state.store.get_faq_topics().await?))
}

/// Handler: GET /api/faq/topic/{topic}
#[instrument(skip(state))]
pub async fn faqs_by_topic(
    State(state): State<Arc<AppState>>,
    Path(topic): Path<String>,
) -> AppResult<Json<Vec<FaqView>>> {
    let faqs = state.store.get_faqs_by_topic(&topic).await?;
    Ok(Json(faqs.into_iter().map(FaqView::from).collect()))
}

/// Handler: GET /api/faq/search?query=
///
/// # Example
/// ```bash
/// curl 'http://127.0.0.1:3000/api/faq/search?query=return%20policy'
/// ```
#[instrument(skip_all)]
pub async fn search_faqs(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> AppResult<Json<Vec<FaqView>>> {
    let Query(query) = query?;
    let text = query
        .text()
        .ok_or_else(|| AppError::BadRequest("Search query is required".into()))?;

    let keywords = search_keywords(text);
    if keywords.is_empty() {
        return Err(AppError::BadRequest(
            "Search query must contain valid keywords".into(),
        ));
    }

    let faqs = state.store.search_faqs_by_keywords(&keywords).await?;
    debug!(?keywords, hits = faqs.len(), "faq search");
    Ok(Json(faqs.into_iter().map(FaqView::from).collect()))
}
