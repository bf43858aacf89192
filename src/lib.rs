//! Server library - exposes the modules to the binary and the tests

pub mod core;
pub mod dtos;
pub mod entities;
pub mod repositories;
pub mod ws;

// Re-exports to keep imports short
pub use crate::core::{config, AppState};

use axum::{routing::any, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Build the application router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/ws", any(ws::ws_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// Root endpoint - health check
async fn root() -> &'static str {
    "Server is running!"
}
