use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Everything here has a sensible default — the OpenAI API key is NOT part
/// of the config because it is re-resolved per analysis request through the
/// credential provider chain (see `credentials`).
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Optional JSON secrets file consulted before the environment.
    pub secrets_file: Option<PathBuf>,
    pub openai_base_url: String,
    pub embedding_model: String,
    pub generation_model: String,
    /// Shared budget for one full analysis (three upstream calls joined).
    pub analysis_timeout_secs: u64,
}

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
const DEFAULT_GENERATION_MODEL: &str = "gpt-4o-mini";

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            secrets_file: std::env::var("SECRETS_FILE").ok().map(PathBuf::from),
            openai_base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            embedding_model: std::env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| DEFAULT_EMBEDDING_MODEL.to_string()),
            generation_model: std::env::var("GENERATION_MODEL")
                .unwrap_or_else(|_| DEFAULT_GENERATION_MODEL.to_string()),
            analysis_timeout_secs: std::env::var("ANALYSIS_TIMEOUT_SECS")
                .unwrap_or_else(|_| "120".to_string())
                .parse::<u64>()
                .context("ANALYSIS_TIMEOUT_SECS must be a number of seconds")?,
        })
    }
}

/// Config used by unit tests that need an `AppState` without touching
/// the process environment.
#[cfg(test)]
pub fn test_config() -> Config {
    Config {
        port: 0,
        rust_log: "info".to_string(),
        secrets_file: None,
        openai_base_url: DEFAULT_BASE_URL.to_string(),
        embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
        generation_model: DEFAULT_GENERATION_MODEL.to_string(),
        analysis_timeout_secs: 120,
    }
}
