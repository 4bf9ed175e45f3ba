//! HTTP surface for the cart service.

pub mod handlers;

use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::engine::service::CartService;

#[derive(Clone)]
pub struct AppState {
    pub cart: Arc<CartService>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/v1/cart/:user_id", get(handlers::get_cart))
        .route("/api/v1/cart/add", post(handlers::add_item))
        .route("/api/v1/cart/add-multiple", post(handlers::add_multiple))
        .route("/api/v1/cart/update", put(handlers::update_item))
        .route("/api/v1/cart/remove", delete(handlers::remove_item))
        .route("/api/v1/cart/clear/:user_id", delete(handlers::clear_cart))
        .route("/api/v1/cart/batch-update", post(handlers::batch_update))
        .route("/api/v1/cart/preview-merge", post(handlers::preview_merge))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
