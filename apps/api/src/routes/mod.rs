pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::extract::handlers as extract;
use crate::state::AppState;
use crate::workspace::handlers as workspace;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Browser page
        .route("/", get(workspace::handle_index))
        .route("/analyze", post(workspace::handle_submit))
        .route("/upload", post(workspace::handle_upload))
        .route("/clear", post(workspace::handle_clear))
        // JSON API
        .route("/api/v1/workspace", get(workspace::handle_get_workspace))
        .route("/api/v1/analyze", post(analysis::handle_analyze))
        .route("/api/v1/extract", post(extract::handle_extract))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
