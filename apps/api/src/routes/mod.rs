pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::state::AppState;
use crate::tasks::handlers;

/// API routes plus the static front page, served from `static_dir` for any other path.
pub fn build_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/analyze-task", post(handlers::handle_analyze_task))
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state)
}
