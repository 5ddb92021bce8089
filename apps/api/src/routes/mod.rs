pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::chat::handlers::handle_chat;
use crate::interview::handlers::{handle_generate_mcqs, handle_generate_study_material};
use crate::resume::handlers::handle_analyze;
use crate::state::AppState;

/// Whole-request cap. The resume itself is limited to 5 MiB while streaming.
const REQUEST_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Unknown paths and wrong methods on known paths share this answer.
async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Endpoint not found",
            "availableEndpoints": health::endpoint_index()
        })),
    )
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler).fallback(not_found))
        .route(
            "/api/generate-mcqs",
            post(handle_generate_mcqs).fallback(not_found),
        )
        .route(
            "/api/generate-study-material",
            post(handle_generate_study_material).fallback(not_found),
        )
        .route("/api/analyze", post(handle_analyze).fallback(not_found))
        .route("/api/chat", post(handle_chat).fallback(not_found))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(REQUEST_BODY_LIMIT))
        .with_state(state)
}
