//! Router configuration for the preview server.

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index_page))
        // HTML at any depth is rendered, everything else is a plain file
        .route("/*path", get(handlers::site_file))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
