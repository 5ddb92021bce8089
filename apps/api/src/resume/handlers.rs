//! Axum route handler for resume analysis.

use anyhow::Context;
use axum::extract::{multipart::MultipartRejection, Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::errors::{AppError, GenerationTask};
use crate::resume::analyzer::analyze_resume;
use crate::state::AppState;
use crate::uploads::{read_pdf_field, PendingFile, UploadError};

const RESUME_FIELD: &str = "resume";
const JOB_DESCRIPTION_FIELD: &str = "jobDescription";

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub response: String,
}

#[derive(Debug, Default)]
struct AnalyzeForm {
    job_description: Option<String>,
    resume: Option<PendingFile>,
}

/// POST /api/analyze
///
/// Multipart form with a `resume` PDF and a `jobDescription` text field.
/// The file only reaches disk after every check has passed, and it is released
/// on both the success and the failure path once the answer is prepared.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let form = read_form(multipart?).await?;

    let job_description = form
        .job_description
        .filter(|jd| !jd.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Job description is required".to_string()))?;
    let resume = form
        .resume
        .ok_or_else(|| AppError::Validation("Resume file is required".to_string()))?;

    let upload = state
        .uploads
        .persist(RESUME_FIELD, &resume.file_name, &resume.bytes)
        .await
        .context("Failed to store uploaded resume")?;
    info!("Analyzing resume ({} bytes)...", upload.size_bytes());

    let outcome = analyze_resume(state.llm.as_ref(), &upload, &job_description).await;
    upload.release().await;

    let response = outcome.map_err(|e| state.generation_failed(GenerationTask::ResumeAnalysis, e))?;

    info!("Resume analysis completed");
    Ok(Json(AnalyzeResponse {
        success: true,
        response,
    }))
}

async fn read_form(mut multipart: Multipart) -> Result<AnalyzeForm, AppError> {
    let mut form = AnalyzeForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::Multipart(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            RESUME_FIELD => {
                form.resume = Some(read_pdf_field(field).await?);
            }
            JOB_DESCRIPTION_FIELD => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| UploadError::Multipart(e.body_text()))?;
                form.job_description = Some(text);
            }
            _ => {} // ignore unknown fields
        }
    }

    Ok(form)
}
