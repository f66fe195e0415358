//! Read-only catalog routes: products and order lookup.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use serde::Deserialize;
use support_store::{CatalogStore, Order, Product};
use tracing::instrument;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::faq::faq_response::SearchQuery,
};

#[derive(Debug, Default, Deserialize)]
pub struct ProductFilter {
    pub category: Option<String>,
}

/// Handler: GET /api/products[?category=]
#[instrument(skip_all)]
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    filter: Result<Query<ProductFilter>, QueryRejection>,
) -> AppResult<Json<Vec<Product>>> {
    let Query(filter) = filter?;
    let products = match filter.category.as_deref().map(str::trim) {
        Some(category) if !category.is_empty() => {
            state.store.get_products_by_category(category).await?
        }
        _ => state.store.get_products().await?,
    };
    Ok(Json(products))
}

/// Handler: GET /api/products/search?query=
#[instrument(skip_all)]
pub async fn search_products(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Product>>> {
    let Query(query) = query?;
    let text = query
        .text()
        .ok_or_else(|| AppError::BadRequest("Search query is required".into()))?;
    Ok(Json(state.store.search_products(text).await?))
}

/// Handler: GET /api/orders/{order_number}
///
/// # Example
/// ```bash
/// curl http://127.0.0.1:3000/api/orders/NK123456
/// ```
#[instrument(skip(state))]
pub async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(order_number): Path<String>,
) -> AppResult<Json<Order>> {
    state
        .store
        .get_order_by_number(order_number.trim())
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Order not found".into()))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::test_support::{call, get, test_app};

    #[tokio::test]
    async fn lists_all_or_by_category() {
        let (app, _) = test_app();
        let (status, all) = call(&app, get("/api/products")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(all.as_array().unwrap().len(), 9);

        let (status, gum) = call(&app, get("/api/products?category=nicotine%20gum")).await;
        assert_eq!(status, StatusCode::OK);
        let gum = gum.as_array().unwrap();
        assert_eq!(gum.len(), 1);
        assert_eq!(gum[0]["name"], "Lucy Nicotine Gum");
    }

    #[tokio::test]
    async fn product_search_matches_name() {
        let (app, _) = test_app();
        let (status, body) = call(&app, get("/api/products/search?query=zyn")).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["ZYN Nicotine Pouches", "Zyn Cool Mint 6mg"]);
    }

    #[tokio::test]
    async fn product_search_requires_query() {
        let (app, _) = test_app();
        let (status, _) = call(&app, get("/api/products/search")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn order_lookup_ignores_case() {
        let (app, _) = test_app();
        let (status, body) = call(&app, get("/api/orders/nk234567")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["orderNumber"], "NK234567");
        assert_eq!(body["status"], "Processing");
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let (app, _) = test_app();
        let (status, body) = call(&app, get("/api/orders/NK000000")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "NOT_FOUND");
        assert_eq!(body["message"], "Order not found");
    }
}
