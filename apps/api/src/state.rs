use std::sync::Arc;

use crate::config::Config;
use crate::errors::{AppError, GenerationError, GenerationTask};
use crate::llm_client::TextGenerator;
use crate::uploads::UploadStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable text generator. Production: `LlmClient`; tests use a scripted double.
    pub llm: Arc<dyn TextGenerator>,
    pub uploads: UploadStore,
    pub config: Config,
}

impl AppState {
    /// Wraps a generation failure into the endpoint's public error.
    pub fn generation_failed(&self, task: GenerationTask, source: GenerationError) -> AppError {
        AppError::Generation {
            task,
            source,
            expose_details: self.config.is_development(),
        }
    }
}
