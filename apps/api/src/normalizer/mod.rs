//! Response Normalizer — turns unstructured model output into validated results.
//!
//! Everything here is synchronous and stateless; it never talks to the model.
//! List answers go through `normalize_list_response`, prose answers through
//! `normalize_free_text`.

use serde_json::Value;
use thiserror::Error;

pub mod fences;
pub mod shapes;

pub use shapes::{ItemShape, McqItem, ShapeViolation, StudyTopic};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedJson,
    NotAnArray,
    EmptyResult,
    InvalidItemShape,
}

#[derive(Debug, Error)]
pub enum NormalizationError {
    #[error("Failed to parse AI response as JSON: {source}")]
    MalformedJson {
        /// Payload that failed to parse, kept for server-side diagnostics.
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Response is not an array (got {found})")]
    NotAnArray { found: &'static str },

    #[error("No items generated")]
    EmptyResult,

    #[error("Invalid {kind} structure at index {index}: {violation}")]
    InvalidItemShape {
        kind: &'static str,
        index: usize,
        violation: ShapeViolation,
    },
}

impl NormalizationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NormalizationError::MalformedJson { .. } => ErrorKind::MalformedJson,
            NormalizationError::NotAnArray { .. } => ErrorKind::NotAnArray,
            NormalizationError::EmptyResult => ErrorKind::EmptyResult,
            NormalizationError::InvalidItemShape { .. } => ErrorKind::InvalidItemShape,
        }
    }

    pub fn raw_text(&self) -> Option<&str> {
        match self {
            NormalizationError::MalformedJson { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

/// Parses a model answer into a non-empty list of validated items.
///
/// Steps: extract the fenced payload, parse JSON, require an array, require at
/// least one element, then validate elements in order and stop at the first bad one.
/// Items are returned as produced; nothing is coerced or defaulted.
pub fn normalize_list_response<T: ItemShape>(raw_text: &str) -> Result<Vec<T>, NormalizationError> {
    let value = parse_payload(raw_text)?;

    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(NormalizationError::NotAnArray {
                found: json_type_name(&other),
            })
        }
    };

    if items.is_empty() {
        return Err(NormalizationError::EmptyResult);
    }

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            T::from_value(item).map_err(|violation| NormalizationError::InvalidItemShape {
                kind: T::KIND,
                index,
                violation,
            })
        })
        .collect()
}

/// Parses the fenced block first. When that is not valid JSON (for example a
/// fence inside a string value cut the block short) every marker is deleted
/// and the whole answer is parsed instead.
fn parse_payload(raw_text: &str) -> Result<Value, NormalizationError> {
    let payload = fences::extract_payload(raw_text);
    let source = match serde_json::from_str(&payload) {
        Ok(value) => return Ok(value),
        Err(source) => source,
    };

    let stripped = fences::strip_fences(raw_text);
    if stripped != payload {
        if let Ok(value) = serde_json::from_str(&stripped) {
            return Ok(value);
        }
    }

    Err(NormalizationError::MalformedJson {
        raw: payload,
        source,
    })
}

/// Strips fence markers from a prose answer. No parsing.
pub fn normalize_free_text(raw_text: &str) -> String {
    fences::strip_fences(raw_text)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
