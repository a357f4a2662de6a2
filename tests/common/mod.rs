//! Shared test doubles.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use web_digest::config::PipelineConfig;
use web_digest::llm::{LlmError, TextGenerator};
use web_digest::pipeline::Pipeline;
use web_digest::AppState;

/// A `TextGenerator` that replies with a fixed text (or fails) and records prompts.
pub struct ScriptedGenerator {
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => Err(LlmError::Provider {
                status: 503,
                body: "provider unavailable".to_string(),
            }),
        }
    }
}

pub fn test_config() -> PipelineConfig {
    PipelineConfig {
        fetch_timeout: Duration::from_secs(2),
        connect_timeout: Duration::from_secs(1),
        ..PipelineConfig::default()
    }
}

pub fn pipeline_with(generator: Arc<ScriptedGenerator>) -> Pipeline {
    Pipeline::new(&test_config(), generator).unwrap()
}

pub fn state_with(generator: Arc<ScriptedGenerator>) -> AppState {
    AppState {
        pipeline: Arc::new(pipeline_with(generator)),
    }
}

pub const ARTICLE_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><title>Ferris Weekly</title></head>
<body>
  <nav><a href="/">Home</a> <a href="/archive">Archive</a></nav>
  <div class="cookie-notice">We use cookies <button>OK</button></div>
  <article>
    <h1>Crabs of the Week</h1>
    <p>Ferris molted twice this week.</p>
    <ul><li>Shell size: large</li><li>Mood: cheerful</li></ul>
  </article>
  <script>track()</script>
  <footer>All rights reserved</footer>
</body>
</html>"#;
