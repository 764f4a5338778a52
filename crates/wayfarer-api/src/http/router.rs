//! Axum router configuration with middleware.
//!
//! Routes sit at the root (no version prefix); the chat frontend talks to
//! them directly. Middleware: CORS (any origin) and request tracing.

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route(
            "/create_conversation",
            get(handlers::conversation::create_conversation),
        )
        .route("/query", get(handlers::conversation::query))
        .route("/message", get(handlers::conversation::latest_message))
        .route(
            "/conversation/{id}",
            get(handlers::ws::ws_handler).delete(handlers::conversation::delete_conversation),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET / - Plain-text liveness check.
async fn root() -> &'static str {
    "API is running properly"
}

/// GET /health - JSON health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
