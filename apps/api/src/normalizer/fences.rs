//! Markdown code-fence handling for raw model output.

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Deletes every fence marker (and the newline that directly follows it) wherever
/// it appears, then trims. Used for prose answers.
pub fn strip_fences(text: &str) -> String {
    text.replace("```json\n", "")
        .replace(JSON_FENCE, "")
        .replace("```\n", "")
        .replace(FENCE, "")
        .trim()
        .to_string()
}

/// Returns the JSON payload of a model answer.
///
/// If an opening fence (optionally tagged `json`) is followed by a closing fence,
/// the text between them is the payload, even when prose surrounds the block.
/// Otherwise stray markers are deleted and the whole text is the payload.
pub fn extract_payload(text: &str) -> String {
    let text = text.trim();

    let Some(open) = text.find(FENCE) else {
        return text.to_string();
    };

    let body_start = if text[open..].starts_with(JSON_FENCE) {
        open + JSON_FENCE.len()
    } else {
        open + FENCE.len()
    };

    match text[body_start..].find(FENCE) {
        Some(len) => text[body_start..body_start + len].trim().to_string(),
        None => strip_fences(text),
    }
}
