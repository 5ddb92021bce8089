//! Axum route handler for the career chat.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::chat::prompts::CHAT_PROMPT_TEMPLATE;
use crate::errors::{AppError, GenerationError, GenerationTask};
use crate::llm_client::{GenerationRequest, TextGenerator};
use crate::normalizer::normalize_free_text;
use crate::state::AppState;

/// Characters of the user message that make it into the logs.
const LOG_PREVIEW_CHARS: usize = 50;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub success: bool,
    pub reply: String,
}

/// POST /api/chat
///
/// Failures use the same 500 convention as every other endpoint; the body
/// still carries an apology `reply` the chat widget can show as-is.
pub async fn handle_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(request) = payload?;
    let message = request
        .message
        .as_deref()
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Message is required".to_string()))?;

    let preview: String = message.chars().take(LOG_PREVIEW_CHARS).collect();
    info!("Processing chat message: {preview}...");

    let reply = career_reply(state.llm.as_ref(), message)
        .await
        .map_err(|e| state.generation_failed(GenerationTask::Chat, e))?;

    info!("Chat response generated");
    Ok(Json(ChatResponse {
        success: true,
        reply,
    }))
}

async fn career_reply(llm: &dyn TextGenerator, message: &str) -> Result<String, GenerationError> {
    let prompt = CHAT_PROMPT_TEMPLATE.replace("{message}", message);
    let raw = llm.generate(GenerationRequest::text(prompt)).await?;
    Ok(normalize_free_text(&raw))
}
