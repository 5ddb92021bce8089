//! Axum route handlers for MCQ and study-material generation.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{AppError, GenerationTask};
use crate::interview::generator::{generate_mcqs, generate_study_material};
use crate::normalizer::shapes::Difficulty;
use crate::normalizer::{McqItem, StudyTopic};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SubjectRequest {
    #[serde(default)]
    pub subject: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct McqResponse {
    pub success: bool,
    pub questions: Vec<McqItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyMaterialResponse {
    pub success: bool,
    pub study_material: Vec<StudyTopic>,
}

/// POST /api/generate-mcqs
pub async fn handle_generate_mcqs(
    State(state): State<AppState>,
    payload: Result<Json<SubjectRequest>, JsonRejection>,
) -> Result<Json<McqResponse>, AppError> {
    let Json(request) = payload?;
    let subject = require_subject(&request)?;
    info!("Generating MCQs for subject: {subject}");

    let questions = generate_mcqs(state.llm.as_ref(), subject)
        .await
        .map_err(|e| state.generation_failed(GenerationTask::Mcqs, e))?;

    let count = |level: Difficulty| questions.iter().filter(|q| q.difficulty() == Some(level)).count();
    info!(
        easy = count(Difficulty::Easy),
        medium = count(Difficulty::Medium),
        hard = count(Difficulty::Hard),
        "Successfully generated {} MCQs",
        questions.len()
    );
    Ok(Json(McqResponse {
        success: true,
        questions,
    }))
}

/// POST /api/generate-study-material
pub async fn handle_generate_study_material(
    State(state): State<AppState>,
    payload: Result<Json<SubjectRequest>, JsonRejection>,
) -> Result<Json<StudyMaterialResponse>, AppError> {
    let Json(request) = payload?;
    let subject = require_subject(&request)?;
    info!("Generating study material for: {subject}");

    let study_material = generate_study_material(state.llm.as_ref(), subject)
        .await
        .map_err(|e| state.generation_failed(GenerationTask::StudyMaterial, e))?;

    let answer_chars: usize = study_material
        .iter()
        .filter_map(StudyTopic::answer)
        .map(|a| a.chars().count())
        .sum();
    info!(
        answer_chars,
        "Successfully generated {} study topics",
        study_material.len()
    );
    Ok(Json(StudyMaterialResponse {
        success: true,
        study_material,
    }))
}

fn require_subject(request: &SubjectRequest) -> Result<&str, AppError> {
    request
        .subject
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("Subject is required".to_string()))
}
