//! Shared fixtures for unit and router tests.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use serde_json::{json, Value};

use crate::config::{Config, Environment};
use crate::llm_client::{GenerationRequest, LlmError, TextGenerator};
use crate::state::AppState;
use crate::uploads::UploadStore;

/// Scripted `TextGenerator` that records every request it receives.
/// Replies are consumed in order; the last one repeats.
#[derive(Default)]
pub struct StubGenerator {
    replies: Mutex<VecDeque<Result<String, u16>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl StubGenerator {
    pub fn replying(text: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(VecDeque::from([Ok(text.into())])),
            ..Default::default()
        })
    }

    /// Fails every call with an upstream API error of the given status.
    pub fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(VecDeque::from([Err(status)])),
            ..Default::default()
        })
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request);

        let mut replies = self.replies.lock().unwrap();
        let reply = if replies.len() > 1 {
            replies.pop_front()
        } else {
            replies.front().cloned()
        };

        match reply {
            Some(Ok(text)) => Ok(text),
            Some(Err(status)) => Err(LlmError::Api {
                status,
                message: "stubbed upstream failure".to_string(),
            }),
            None => Err(LlmError::EmptyContent),
        }
    }
}

pub fn test_config(upload_dir: &Path) -> Config {
    Config {
        gemini_api_key: "test-key".to_string(),
        port: 0,
        client_url: None,
        environment: Environment::Production,
        upload_dir: upload_dir.to_path_buf(),
        upload_max_age: Duration::from_secs(3600),
        sweep_interval: Duration::from_secs(3600),
        rust_log: "debug".to_string(),
    }
}

pub fn test_state(llm: Arc<StubGenerator>, upload_dir: &Path) -> AppState {
    AppState {
        llm,
        uploads: UploadStore::new(upload_dir),
        config: test_config(upload_dir),
    }
}

/// A well-formed batch of `count` MCQs, as the model would print them.
pub fn mcq_batch_json(count: usize) -> Value {
    let difficulties = ["easy", "easy", "easy", "medium", "medium", "medium", "medium", "hard", "hard", "hard"];
    Value::Array(
        (0..count)
            .map(|i| {
                json!({
                    "id": i + 1,
                    "question": format!("Question {}?", i + 1),
                    "options": ["Option A", "Option B", "Option C", "Option D"],
                    "correct": i % 4,
                    "explanation": "Because.",
                    "difficulty": difficulties[i % difficulties.len()]
                })
            })
            .collect(),
    )
}

pub fn fenced(value: &Value) -> String {
    format!("```json\n{}\n```", serde_json::to_string_pretty(value).unwrap())
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// One part of a hand-built multipart/form-data body.
pub enum FormPart<'a> {
    Text {
        name: &'a str,
        value: &'a str,
    },
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        data: &'a [u8],
    },
}

pub const BOUNDARY: &str = "----guidance-test-boundary";

pub fn multipart_request(uri: &str, parts: &[FormPart<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            FormPart::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            FormPart::File {
                name,
                file_name,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn upload_dir_is_empty(dir: &Path) -> bool {
    match std::fs::read_dir(dir) {
        Ok(mut entries) => entries.next().is_none(),
        Err(_) => true,
    }
}
