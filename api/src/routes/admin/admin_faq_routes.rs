//! FAQ administration. Writes go through `FaqIndexer`, which keeps each
//! FAQ's text and embedding in step.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use support_store::FaqStore;
use tracing::instrument;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::{
        admin::admin_faq_request::{CreateFaqRequest, UpdateFaqRequest},
        faq::faq_response::FaqView,
    },
};

/// Handler: GET /api/admin/faqs
#[instrument(skip_all)]
pub async fn list_faqs(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<FaqView>>> {
    let faqs = state.store.get_faqs().await?;
    Ok(Json(faqs.into_iter().map(FaqView::from).collect()))
}

/// Handler: GET /api/admin/faqs/{id}
#[instrument(skip_all)]
pub async fn get_faq(
    State(state): State<Arc<AppState>>,
    id: Result<Path<u64>, PathRejection>,
) -> AppResult<Json<FaqView>> {
    let Path(id) = id?;
    state
        .store
        .get_faq(id)
        .await?
        .map(|faq| Json(FaqView::from(faq)))
        .ok_or_else(|| AppError::NotFound(format!("faq {id} not found")))
}

/// Handler: POST /api/admin/faqs
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:3000/api/admin/faqs \
///   -H 'content-type: application/json' \
///   -d '{"topic":"Payments","question":"Do you accept PayPal?","answer":"Yes.","keywords":["paypal","payment"]}'
/// ```
#[instrument(skip_all)]
pub async fn create_faq(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateFaqRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<FaqView>)> {
    let Json(body) = body?;
    let faq = state.indexer.create(body.into()).await?;
    Ok((StatusCode::CREATED, Json(faq.into())))
}

/// Handler: PUT /api/admin/faqs/{id}
#[instrument(skip_all)]
pub async fn update_faq(
    State(state): State<Arc<AppState>>,
    id: Result<Path<u64>, PathRejection>,
    body: Result<Json<UpdateFaqRequest>, JsonRejection>,
) -> AppResult<Json<FaqView>> {
    let Path(id) = id?;
    let Json(body) = body?;
    let faq = state.indexer.update(id, body.into()).await?;
    Ok(Json(faq.into()))
}

/// Handler: DELETE /api/admin/faqs/{id}
#[instrument(skip_all)]
pub async fn delete_faq(
    State(state): State<Arc<AppState>>,
    id: Result<Path<u64>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path(id) = id?;
    state.indexer.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::json;

    use crate::test_support::{StaticEmbedder, call, get, post_json, put_json, test_app, test_app_with};

    fn delete(uri: &str) -> Request<Body> {
        Request::delete(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn crud_round_trip() {
        let (app, _) = test_app();
        let (status, created) = call(
            &app,
            post_json(
                "/api/admin/faqs",
                json!({
                    "topic": "Payments",
                    "question": "Do you accept PayPal?",
                    "answer": "Yes, PayPal is accepted at checkout.",
                    "keywords": [" PayPal ", "payment", "paypal"]
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["id"], 16);
        assert_eq!(created["keywords"], json!(["paypal", "payment"]));
        assert_eq!(created["hasEmbedding"], false);

        let (status, updated) = call(
            &app,
            put_json("/api/admin/faqs/16", json!({"answer": "Yes, PayPal and Apple Pay."})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["answer"], "Yes, PayPal and Apple Pay.");
        assert_eq!(updated["question"], "Do you accept PayPal?");

        let (status, fetched) = call(&app, get("/api/admin/faqs/16")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, updated);

        let (status, _) = call(&app, delete("/api/admin/faqs/16")).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = call(&app, get("/api/admin/faqs/16")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_input_is_bad_request() {
        let (app, _) = test_app();
        let (status, body) = call(
            &app,
            post_json("/api/admin/faqs", json!({"topic": "T", "question": "Q?", "answer": "A"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "bad request: at least one keyword is required");

        let (status, _) = call(&app, get("/api/admin/faqs/not-a-number")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let (app, _) = test_app();
        let (status, _) = call(&app, put_json("/api/admin/faqs/999", json!({"answer": "x"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = call(&app, delete("/api/admin/faqs/999")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn created_faq_is_embedded_and_answers_chat() {
        let (app, state) = test_app_with(Arc::new(StaticEmbedder(vec![1.0, 0.0])));
        let (status, created) = call(
            &app,
            post_json(
                "/api/admin/faqs",
                json!({
                    "topic": "Payments",
                    "question": "Do you accept PayPal?",
                    "answer": "Yes, PayPal is accepted at checkout.",
                    "keywords": ["paypal"]
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["hasEmbedding"], true);
        assert_eq!(state.store.counts().await.embedded_faqs, 1);

        let (status, reply) = call(
            &app,
            post_json(
                "/api/chat/response",
                json!({"sessionId": "s", "userMessage": "blorp zzz"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply["content"], "Yes, PayPal is accepted at checkout.");
    }

    #[tokio::test]
    async fn list_hides_vectors() {
        let (app, _) = test_app();
        let (status, body) = call(&app, get("/api/admin/faqs")).await;
        assert_eq!(status, StatusCode::OK);
        let faqs = body.as_array().unwrap();
        assert_eq!(faqs.len(), 15);
        assert!(faqs.iter().all(|f| f.get("embedding").is_none()));
    }
}
