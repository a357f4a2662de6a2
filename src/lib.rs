pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod llm;
pub mod pipeline;
pub mod prompt;
pub mod summarizer;

use std::sync::Arc;
use pipeline::Pipeline;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}
