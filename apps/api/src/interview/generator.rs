//! MCQ and study-material generation: prompt → model → list normalizer.

use tracing::debug;

use crate::errors::GenerationError;
use crate::interview::prompts::{MCQ_PROMPT_TEMPLATE, STUDY_PROMPT_TEMPLATE};
use crate::llm_client::prompts::JSON_ARRAY_ONLY;
use crate::llm_client::{GenerationRequest, TextGenerator};
use crate::normalizer::{normalize_list_response, ItemShape, McqItem, StudyTopic};

pub async fn generate_mcqs(
    llm: &dyn TextGenerator,
    subject: &str,
) -> Result<Vec<McqItem>, GenerationError> {
    let questions: Vec<McqItem> = generate_list(llm, MCQ_PROMPT_TEMPLATE, subject).await?;
    for (index, q) in questions.iter().enumerate() {
        debug!(
            index,
            options = q.options().len(),
            correct = ?q.correct(),
            "MCQ: {}",
            q.question().unwrap_or_default()
        );
    }
    Ok(questions)
}

pub async fn generate_study_material(
    llm: &dyn TextGenerator,
    subject: &str,
) -> Result<Vec<StudyTopic>, GenerationError> {
    let topics: Vec<StudyTopic> = generate_list(llm, STUDY_PROMPT_TEMPLATE, subject).await?;
    for (index, topic) in topics.iter().enumerate() {
        debug!(index, "Study topic: {}", topic.question().unwrap_or_default());
    }
    Ok(topics)
}

async fn generate_list<T: ItemShape>(
    llm: &dyn TextGenerator,
    template: &str,
    subject: &str,
) -> Result<Vec<T>, GenerationError> {
    let prompt = build_prompt(template, subject);
    let raw = llm.generate(GenerationRequest::text(prompt)).await?;
    debug!(kind = T::KIND, chars = raw.len(), "Model answered");

    Ok(normalize_list_response(&raw)?)
}

fn build_prompt(template: &str, subject: &str) -> String {
    template
        .replace("{json_only}", JSON_ARRAY_ONLY)
        .replace("{subject}", subject)
}
