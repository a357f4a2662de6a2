//! Scrape and conversation pipelines.
//!
//! Stages run strictly in order and any failure aborts the run: there is no retry
//! and no partial result.

use std::sync::Arc;
use std::time::Instant;

use crate::config::PipelineConfig;
use crate::error::{AppError, Result};
use crate::extract::{extract, ExtractedText};
use crate::fetch::PageFetcher;
use crate::llm::TextGenerator;
use crate::summarizer::{SummaryMode, SummaryRequest, SummaryResult, Summarizer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeOutcome {
    Extracted(ExtractedText),
    Summarized {
        source_url: String,
        summary: SummaryResult,
    },
}

pub struct Pipeline {
    fetcher: PageFetcher,
    summarizer: Summarizer,
    default_word_limit: u32,
}

impl Pipeline {
    pub fn new(config: &PipelineConfig, generator: Arc<dyn TextGenerator>) -> Result<Self> {
        Ok(Self {
            fetcher: PageFetcher::new(config)?,
            summarizer: Summarizer::new(generator, config.llm_timeout),
            default_word_limit: config.default_word_limit,
        })
    }

    pub fn default_word_limit(&self) -> u32 {
        self.default_word_limit
    }

    /// Fetches `url`, extracts its text and, when `summarize` is set, condenses it.
    pub async fn run_scrape_pipeline(
        &self,
        url: &str,
        summarize: bool,
        word_limit: u32,
    ) -> Result<ScrapeOutcome> {
        if summarize && word_limit == 0 {
            return Err(AppError::Validation(
                "word_limit must be greater than zero".to_string(),
            ));
        }

        let started = Instant::now();
        let page = self.fetcher.fetch(url).await?;
        let extracted = extract(&page.raw_html, &page.source_url);
        tracing::info!(
            %url,
            html_bytes = page.raw_html.len(),
            text_chars = extracted.text.len(),
            elapsed = ?started.elapsed(),
            "page extracted"
        );

        if !summarize {
            return Ok(ScrapeOutcome::Extracted(extracted));
        }

        let summary = self
            .summarizer
            .summarize(&SummaryRequest {
                content: extracted.text,
                word_limit,
                mode: SummaryMode::Page,
                source_url: Some(extracted.source_url.clone()),
            })
            .await?;

        Ok(ScrapeOutcome::Summarized {
            source_url: extracted.source_url,
            summary,
        })
    }

    /// Summarizes a raw transcript for hand-off to another agent.
    pub async fn run_conversation_pipeline(&self, transcript: &str) -> Result<SummaryResult> {
        if transcript.trim().is_empty() {
            return Err(AppError::Validation(
                "raw_conversation must not be empty".to_string(),
            ));
        }

        tracing::info!(transcript_chars = transcript.len(), "summarizing conversation");
        self.summarizer
            .summarize(&SummaryRequest {
                content: transcript.to_string(),
                word_limit: self.default_word_limit,
                mode: SummaryMode::Conversation,
                source_url: None,
            })
            .await
    }
}
