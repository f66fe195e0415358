//! Router harness shared by route tests.

use std::{future::Future, pin::Pin, sync::Arc};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use chat_engine::{ChatConfig, EmbeddingError, EmbeddingsProvider, NoopEmbedder};
use serde_json::Value;
use support_store::{MemoryStore, SeedData};
use tower::ServiceExt;

use crate::{core::app_state::AppState, router};

/// Returns the same vector for every input.
pub(crate) struct StaticEmbedder(pub Vec<f32>);

impl EmbeddingsProvider for StaticEmbedder {
    fn embed<'a>(
        &'a self,
        _text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, EmbeddingError>> + Send + 'a>> {
        let v = self.0.clone();
        Box::pin(async move { Ok(v) })
    }

    fn name(&self) -> &str {
        "static"
    }
}

pub(crate) fn test_app_with(provider: Arc<dyn EmbeddingsProvider>) -> (Router, Arc<AppState>) {
    let seed = SeedData::builtin().unwrap();
    let store = Arc::new(MemoryStore::from_seed(seed).unwrap());
    let state = Arc::new(AppState::new(
        store,
        provider,
        ChatConfig::default(),
        None,
        None,
    ));
    (router(state.clone()), state)
}

/// Seeded store, no embedding provider.
pub(crate) fn test_app() -> (Router, Arc<AppState>) {
    test_app_with(Arc::new(NoopEmbedder))
}

pub(crate) fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub(crate) fn post_json(uri: &str, body: Value) -> Request<Body> {
    json_request("POST", uri, body)
}

pub(crate) fn put_json(uri: &str, body: Value) -> Request<Body> {
    json_request("PUT", uri, body)
}

/// Sends `req` through the router; empty bodies come back as `Value::Null`.
pub(crate) async fn call(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}
