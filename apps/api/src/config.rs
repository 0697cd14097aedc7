use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
///
/// The LLM assist is optional: when `ANTHROPIC_API_KEY` is unset the engine
/// runs on the deterministic keyword strategies only.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: Option<String>,
    /// Timeout for fetching a job posting URL, in seconds.
    pub fetch_timeout_secs: u64,
    /// Redirect cap for posting fetches.
    pub fetch_max_redirects: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            fetch_timeout_secs: std::env::var("FETCH_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse::<u64>()
                .context("FETCH_TIMEOUT_SECS must be a number of seconds")?,
            fetch_max_redirects: std::env::var("FETCH_MAX_REDIRECTS")
                .unwrap_or_else(|_| "5".to_string())
                .parse::<usize>()
                .context("FETCH_MAX_REDIRECTS must be a non-negative integer")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
