use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ConversationRequest {
    pub raw_conversation: String,
}

#[derive(Debug, Deserialize)]
pub struct ScrapeRequest {
    pub url: String,
    #[serde(default)]
    pub summarize: bool,
    /// Falls back to the configured default when absent or null.
    #[serde(default)]
    pub word_limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub summary: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ScrapeResponse {
    Extracted { url: String, extracted_text: String },
    Summarized { url: String, summary: String },
}
