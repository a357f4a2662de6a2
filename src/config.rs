use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use crate::error::{AppError, Result};

pub const DEFAULT_WORD_LIMIT: u32 = 200;
pub const DEFAULT_LLM_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_LLM_MODEL: &str = "google/gemini-2.5-flash";

/// Desktop Chrome user agent sent with every page fetch.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub llm: LlmConfig,
    pub pipeline: PipelineConfig,
}

/// Connection settings for the text-completion provider.
#[derive(Clone, Debug)]
pub struct LlmConfig {
    pub api_key: String,
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
}

/// Settings handed to the pipeline at construction.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub fetch_timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
    pub default_word_limit: u32,
    /// Upper bound on a single completion call. `None` leaves it to the provider.
    pub llm_timeout: Option<Duration>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            user_agent: BROWSER_USER_AGENT.to_string(),
            default_word_limit: DEFAULT_WORD_LIMIT,
            llm_timeout: Some(Duration::from_secs(60)),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENROUTER_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::Config("OPENROUTER_API_KEY is not set".to_string()))?;

        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = lookup("PORT").unwrap_or_else(|| "3000".to_string());
        let port = port
            .parse::<u16>()
            .map_err(|e| AppError::Config(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host)
            .map_err(|e| AppError::Config(format!("Invalid host address: {}", e)))?;

        let llm = LlmConfig {
            api_key,
            endpoint: lookup("LLM_ENDPOINT").unwrap_or_else(|| DEFAULT_LLM_ENDPOINT.to_string()),
            model: lookup("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            temperature: parse_or(&lookup, "LLM_TEMPERATURE", 0.7)?,
        };

        let defaults = PipelineConfig::default();
        let default_word_limit = positive_or(&lookup, "DEFAULT_WORD_LIMIT", DEFAULT_WORD_LIMIT)?;
        let fetch_timeout_secs: u64 = positive_or(&lookup, "FETCH_TIMEOUT_SECS", 10)?;
        let connect_timeout_secs: u64 = positive_or(&lookup, "FETCH_CONNECT_TIMEOUT_SECS", 5)?;

        let llm_timeout_secs: u64 = parse_or(&lookup, "LLM_TIMEOUT_SECS", 60)?;
        let pipeline = PipelineConfig {
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            connect_timeout: Duration::from_secs(connect_timeout_secs),
            default_word_limit,
            llm_timeout: (llm_timeout_secs > 0).then(|| Duration::from_secs(llm_timeout_secs)),
            ..defaults
        };

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            llm,
            pipeline,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| AppError::Config(format!("Invalid {}: {}", key, e))),
        None => Ok(default),
    }
}

fn positive_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Default + PartialEq,
    T::Err: std::fmt::Display,
{
    let value = parse_or(lookup, key, default)?;
    if value == T::default() {
        return Err(AppError::Config(format!("{} must be greater than zero", key)));
    }
    Ok(value)
}
