//! Thin HTTP surface over the list engine.

pub mod error;
pub mod handlers;
mod middleware;
pub mod models;
mod state;

pub use state::HttpState;

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, post},
};

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/api/mylist/add", post(handlers::add_item))
        .route("/api/mylist/remove/{content_id}", delete(handlers::remove_item))
        .route("/api/mylist/items", get(handlers::list_items))
        .route("/api/mylist/stats", get(handlers::get_stats))
        .route("/health", get(handlers::health))
        .layer(axum_middleware::from_fn(middleware::log_responses))
        .with_state(state)
}
