//! API routes definition

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Build the API router with all endpoints
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Message routes
        .route("/messages", post(handlers::post_message).get(handlers::list_messages))
        .route("/messages/count", get(handlers::count_messages))
        .route("/messages/:index", get(handlers::get_message))
        // Author routes
        .route("/authors/:author/messages", get(handlers::messages_by_author))
        // Liveness
        .route("/health", get(handlers::health))
        .with_state(state)
}
