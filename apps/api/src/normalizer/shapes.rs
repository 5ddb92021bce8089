//! Item shapes accepted by the list normalizer.
//!
//! A validated item keeps the exact JSON object the model produced (extra fields
//! pass through untouched); the typed accessors are read-only views over it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Why a single list element was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeViolation {
    #[error("item is not an object")]
    NotAnObject,

    #[error("missing or empty field `{0}`")]
    MissingField(&'static str),

    #[error("field `{0}` must be an array")]
    NotAnArray(&'static str),
}

/// A list element shape with its own validation rule.
pub trait ItemShape: Sized {
    /// Human-readable name used in error messages.
    const KIND: &'static str;

    fn from_value(value: Value) -> Result<Self, ShapeViolation>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// One multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct McqItem(Map<String, Value>);

impl McqItem {
    #[allow(dead_code)]
    pub fn id(&self) -> Option<u64> {
        self.0.get("id").and_then(Value::as_u64)
    }

    pub fn question(&self) -> Option<&str> {
        self.0.get("question").and_then(Value::as_str)
    }

    pub fn options(&self) -> &[Value] {
        self.0
            .get("options")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Index of the correct option, if the model gave a non-negative integer.
    pub fn correct(&self) -> Option<u64> {
        self.0.get("correct").and_then(Value::as_u64)
    }

    #[allow(dead_code)]
    pub fn explanation(&self) -> Option<&str> {
        self.0.get("explanation").and_then(Value::as_str)
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.0
            .get("difficulty")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
    }
}

impl ItemShape for McqItem {
    const KIND: &'static str = "question";

    /// Requires a truthy `question`, an array `options`, and a present `correct`.
    /// `correct` is a presence check only: `0` is the first option, not a missing value.
    fn from_value(value: Value) -> Result<Self, ShapeViolation> {
        let Value::Object(map) = value else {
            return Err(ShapeViolation::NotAnObject);
        };

        if !map.get("question").is_some_and(is_truthy) {
            return Err(ShapeViolation::MissingField("question"));
        }
        match map.get("options") {
            None => return Err(ShapeViolation::MissingField("options")),
            Some(Value::Array(_)) => {}
            Some(_) => return Err(ShapeViolation::NotAnArray("options")),
        }
        if !map.contains_key("correct") {
            return Err(ShapeViolation::MissingField("correct"));
        }

        Ok(McqItem(map))
    }
}

/// One study topic: a title and a long-form explanation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StudyTopic(Map<String, Value>);

impl StudyTopic {
    #[allow(dead_code)]
    pub fn id(&self) -> Option<u64> {
        self.0.get("id").and_then(Value::as_u64)
    }

    pub fn question(&self) -> Option<&str> {
        self.0.get("question").and_then(Value::as_str)
    }

    pub fn answer(&self) -> Option<&str> {
        self.0.get("answer").and_then(Value::as_str)
    }
}

impl ItemShape for StudyTopic {
    const KIND: &'static str = "study material";

    fn from_value(value: Value) -> Result<Self, ShapeViolation> {
        let Value::Object(map) = value else {
            return Err(ShapeViolation::NotAnObject);
        };

        for field in ["question", "answer"] {
            if !map.get(field).is_some_and(is_truthy) {
                return Err(ShapeViolation::MissingField(field));
            }
        }

        Ok(StudyTopic(map))
    }
}

/// Loose truthiness: null, false, zero, and "" are falsy; everything else is truthy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
