use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, UPGRADE_INSECURE_REQUESTS, USER_AGENT,
};
use reqwest::{Client, ClientBuilder, StatusCode};
use std::time::Instant;
use url::Url;

use crate::config::{PipelineConfig, BROWSER_USER_AGENT};
use crate::error::{AppError, Result};

/// Raw page body as returned by a successful fetch.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub raw_html: String,
    pub source_url: String,
}

/// Performs single-shot GET requests that look like a desktop browser.
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static(BROWSER_USER_AGENT)),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

        let client = ClientBuilder::new()
            .default_headers(headers)
            .timeout(config.fetch_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    pub async fn fetch(&self, url: &str) -> Result<FetchResult> {
        let parsed = Url::parse(url)
            .map_err(|e| AppError::Validation(format!("Invalid URL '{}': {}", url, e)))?;

        let started = Instant::now();
        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| AppError::FetchTransport(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(%url, status = status.as_u16(), "page fetch returned non-200 status");
            return Err(AppError::FetchStatus {
                status: status.as_u16(),
            });
        }

        let raw_html = response
            .text()
            .await
            .map_err(|e| AppError::FetchTransport(e.to_string()))?;

        tracing::debug!(
            %url,
            bytes = raw_html.len(),
            elapsed = ?started.elapsed(),
            "page fetched"
        );

        Ok(FetchResult {
            raw_html,
            source_url: url.to_string(),
        })
    }
}
