//! HTTP surface of the support chat.

use std::{
    env,
    future::{Future, IntoFuture},
    sync::Arc,
};

pub mod core;
pub mod error_handler;
pub mod middleware_layer;
pub mod routes;

#[cfg(test)]
pub(crate) mod test_support;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::{net::TcpListener, signal};
use tracing::{debug, error, info};

use crate::{
    core::app_state::AppState,
    error_handler::AppError,
    middleware_layer::request_id::request_id_layer,
    routes::{
        admin::admin_faq_routes::{create_faq, delete_faq, get_faq, list_faqs, update_faq},
        catalog::catalog_routes::{get_order, list_products, search_products},
        chat::chat_routes::{bot_response, chat_history, clear_chat, init_chat, send_message},
        faq::faq_routes::{faq_topics, faqs_by_topic, search_faqs},
        health::health_route::health,
    },
};

pub const DEFAULT_API_ADDRESS: &str = "0.0.0.0:3000";

/// Builds the application router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/chat/init", post(init_chat))
        .route("/api/chat/message", post(send_message))
        .route("/api/chat/response", post(bot_response))
        .route("/api/chat/clear", post(clear_chat))
        .route("/api/chat/history/{session_id}", get(chat_history))
        .route("/api/faq/topics", get(faq_topics))
        .route("/api/faq/topic/{topic}", get(faqs_by_topic))
        .route("/api/faq/search", get(search_faqs))
        .route("/api/products", get(list_products))
        .route("/api/products/search", get(search_products))
        .route("/api/orders/{order_number}", get(get_order))
        .route("/api/admin/faqs", get(list_faqs).post(create_faq))
        .route(
            "/api/admin/faqs/{id}",
            get(get_faq).put(update_faq).delete(delete_faq),
        )
        .route("/api/health", get(health))
        .layer(middleware::from_fn(request_id_layer))
        .with_state(state)
}

pub async fn start() -> Result<(), AppError> {
    let host_url = env::var("API_ADDRESS").unwrap_or_else(|_| DEFAULT_API_ADDRESS.to_string());

    let state = Arc::new(AppState::from_env()?);
    let app = router(state.clone());

    // Bind to address
    let listener = TcpListener::bind(&host_url).await.map_err(AppError::Bind)?;
    info!(address = %host_url, "support chat api listening");

    // Serve with graceful shutdown on Ctrl+C while missing FAQ embeddings are computed
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .into_future();
    serve_while_indexing(server, index_missing_faqs(&state))
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Drives `server` to completion, polling `indexing` alongside it. An
/// unfinished indexing pass is dropped once the server stops.
async fn serve_while_indexing<S, I>(server: S, indexing: I) -> S::Output
where
    S: Future,
    I: Future<Output = ()>,
{
    tokio::pin!(server);
    tokio::pin!(indexing);
    let mut indexed = false;
    loop {
        tokio::select! {
            served = &mut server => {
                if !indexed {
                    info!("shutdown before faq indexing finished, pass cancelled");
                }
                return served;
            }
            () = &mut indexing, if !indexed => indexed = true,
        }
    }
}

/// Embeds FAQs that lack an embedding. Requests served meanwhile fall back
/// to keyword matching.
async fn index_missing_faqs(state: &AppState) {
    if state.embedding.is_none() {
        debug!("no embedding model configured, skipping faq indexing");
        return;
    }
    if let Err(e) = state.indexer.initialize_missing().await {
        error!(error = %e, "faq embedding initialization failed");
    }
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{
            Arc,
            atomic::{AtomicBool, Ordering},
        },
        time::Duration,
    };

    use tokio::sync::oneshot;

    use super::serve_while_indexing;

    #[tokio::test]
    async fn stopped_server_does_not_wait_for_indexing() {
        let server = async { Ok::<(), io::Error>(()) };
        let indexing = std::future::pending::<()>();
        let served = tokio::time::timeout(
            Duration::from_secs(1),
            serve_while_indexing(server, indexing),
        )
        .await
        .expect("server result returned while indexing still pending");
        assert!(served.is_ok());
    }

    #[tokio::test]
    async fn server_keeps_running_after_indexing_finishes() {
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let indexed = Arc::new(AtomicBool::new(false));

        let server = {
            let indexed = indexed.clone();
            async move {
                let _ = stop_rx.await;
                Ok::<bool, io::Error>(indexed.load(Ordering::SeqCst))
            }
        };
        let indexing = {
            let indexed = indexed.clone();
            async move {
                indexed.store(true, Ordering::SeqCst);
                let _ = stop_tx.send(());
            }
        };

        let saw_indexing = serve_while_indexing(server, indexing).await.unwrap();
        assert!(saw_indexing);
    }
}
