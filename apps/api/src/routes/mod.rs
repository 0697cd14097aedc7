pub mod health;

use axum::{routing::get, routing::post, Router};

use crate::analyzer::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/analyzer/analyze", post(handlers::handle_analyze))
        .route("/api/v1/analyzer/tailor", post(handlers::handle_tailor))
        .route(
            "/api/v1/analyzer/quick-check",
            post(handlers::handle_quick_check),
        )
        .with_state(state)
}
