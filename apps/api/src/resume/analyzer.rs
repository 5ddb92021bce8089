use tracing::debug;

use crate::errors::GenerationError;
use crate::llm_client::{Attachment, GenerationRequest, TextGenerator};
use crate::normalizer::normalize_free_text;
use crate::resume::prompts::ANALYZE_PROMPT_TEMPLATE;
use crate::uploads::StoredUpload;

/// Reads the stored resume and asks the model for a prose analysis.
/// Does not release the upload; the caller owns it.
pub async fn analyze_resume(
    llm: &dyn TextGenerator,
    upload: &StoredUpload,
    job_description: &str,
) -> Result<String, GenerationError> {
    let pdf = upload.read().await?;
    debug!(path = %upload.path().display(), bytes = pdf.len(), "Resume loaded for analysis");

    let prompt = ANALYZE_PROMPT_TEMPLATE.replace("{job_description}", job_description);
    let request = GenerationRequest::text(prompt).with_attachment(Attachment::pdf(pdf));
    let raw = llm.generate(request).await?;

    Ok(normalize_free_text(&raw))
}
