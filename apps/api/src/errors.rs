use std::fmt;

use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::normalizer::NormalizationError;
use crate::uploads::UploadError;

pub const CHAT_APOLOGY: &str = "Sorry, I encountered an error. Please try again.";

/// Which generation an error belongs to. Drives the public failure envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationTask {
    Mcqs,
    StudyMaterial,
    ResumeAnalysis,
    Chat,
}

impl GenerationTask {
    pub fn failure_message(self) -> &'static str {
        match self {
            GenerationTask::Mcqs => "Failed to generate questions",
            GenerationTask::StudyMaterial => "Failed to generate study material",
            GenerationTask::ResumeAnalysis => "Failed to analyze resume",
            GenerationTask::Chat => "Failed to generate a reply",
        }
    }
}

impl fmt::Display for GenerationTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GenerationTask::Mcqs => "MCQ generation",
            GenerationTask::StudyMaterial => "Study material generation",
            GenerationTask::ResumeAnalysis => "Resume analysis",
            GenerationTask::Chat => "Chat",
        };
        f.write_str(name)
    }
}

/// Everything that can go wrong between an accepted request and a model answer.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Upstream(#[from] LlmError),

    #[error(transparent)]
    Normalization(#[from] NormalizationError),

    #[error("Failed to read uploaded file: {0}")]
    UploadRead(#[from] std::io::Error),
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upload rejected: {0}")]
    Upload(#[from] UploadError),

    #[error("{task} failed: {source}")]
    Generation {
        task: GenerationTask,
        #[source]
        source: GenerationError,
        /// Development mode: include the underlying message in the response.
        expose_details: bool,
    },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Malformed JSON bodies (wrong content type, bad syntax, wrong field types)
/// are client errors in the same envelope as missing fields.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::Upload(UploadError::Multipart(rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "error": msg }),
            ),
            AppError::Upload(e) => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "error": e.to_string() }),
            ),
            AppError::Generation {
                task,
                source,
                expose_details,
            } => {
                log_generation_failure(task, &source);
                let details = expose_details.then(|| source.to_string());
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    generation_failure_body(task, details),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "success": false, "error": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

fn log_generation_failure(task: GenerationTask, source: &GenerationError) {
    match source {
        GenerationError::Normalization(e) => {
            tracing::error!(%task, kind = ?e.kind(), error = %e, "Model answer rejected");
            if let Some(raw) = e.raw_text() {
                tracing::error!(%task, "Response text: {raw}");
            }
        }
        GenerationError::Upstream(e) => {
            tracing::error!(%task, error = %e, "Model call failed");
        }
        GenerationError::UploadRead(e) => {
            tracing::error!(%task, error = %e, "Uploaded file unreadable");
        }
    }
}

/// Per-endpoint failure envelope. Details only appear when `details` is set.
fn generation_failure_body(task: GenerationTask, details: Option<String>) -> Value {
    let mut body = Map::new();
    body.insert("success".into(), Value::Bool(false));
    if task == GenerationTask::Chat {
        body.insert("reply".into(), Value::from(CHAT_APOLOGY));
    }
    body.insert("error".into(), Value::from(task.failure_message()));
    if let Some(details) = details {
        let key = match task {
            GenerationTask::ResumeAnalysis => "details",
            _ => "message",
        };
        body.insert(key.into(), Value::from(details));
    }
    Value::Object(body)
}
