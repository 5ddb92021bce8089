// Shared prompt fragments. Each feature defines its own prompts.rs alongside it;
// this file contains cross-cutting instructions.

/// Appended to every prompt whose answer is parsed by the list normalizer.
pub const JSON_ARRAY_ONLY: &str = "Return ONLY a valid JSON array with this exact structure \
    (no additional text, no markdown, no code blocks):";
