use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{AppError, Result};
use crate::llm::TextGenerator;
use crate::prompt::{conversation_summary_prompt, page_summary_prompt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryMode {
    Page,
    Conversation,
}

#[derive(Debug, Clone)]
pub struct SummaryRequest {
    pub content: String,
    pub word_limit: u32,
    pub mode: SummaryMode,
    pub source_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryResult {
    pub text: String,
    /// Whether the model stayed within the requested word limit. The text is never
    /// truncated to make this true.
    pub within_limit: bool,
}

/// Condenses text with a single completion call.
#[derive(Clone)]
pub struct Summarizer {
    generator: Arc<dyn TextGenerator>,
    timeout: Option<Duration>,
}

impl Summarizer {
    pub fn new(generator: Arc<dyn TextGenerator>, timeout: Option<Duration>) -> Self {
        Self { generator, timeout }
    }

    pub async fn summarize(&self, request: &SummaryRequest) -> Result<SummaryResult> {
        if request.word_limit == 0 {
            return Err(AppError::Validation(
                "word_limit must be greater than zero".to_string(),
            ));
        }

        let prompt = match request.mode {
            SummaryMode::Page => page_summary_prompt(
                &request.content,
                request.word_limit,
                request.source_url.as_deref(),
            ),
            SummaryMode::Conversation => {
                conversation_summary_prompt(&request.content, request.word_limit)
            }
        };

        let started = Instant::now();
        let generation = self.generator.generate(&prompt);
        let outcome = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, generation).await.map_err(|_| {
                AppError::Summarization(format!("completion timed out after {:?}", limit))
            })?,
            None => generation.await,
        };
        let text = outcome.map_err(|e| AppError::Summarization(e.to_string()))?;

        if text.trim().is_empty() {
            return Err(AppError::Summarization(
                "model returned an empty summary".to_string(),
            ));
        }

        let words = text.split_whitespace().count();
        let within_limit = words <= request.word_limit as usize;
        tracing::info!(
            mode = ?request.mode,
            words,
            word_limit = request.word_limit,
            within_limit,
            elapsed = ?started.elapsed(),
            "summary generated"
        );

        Ok(SummaryResult { text, within_limit })
    }
}
