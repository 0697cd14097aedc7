//! Posting page retrieval. The HTTP client is built per request with the
//! configured timeout and redirect bound, so fetch behavior is scoped to the
//! call rather than held as process-wide state. No internal retries: a
//! failed fetch surfaces immediately as `AppError::Fetch`.

use chrono::{DateTime, Utc};
use reqwest::redirect;
use tracing::debug;

use crate::config::Config;
use crate::errors::AppError;

/// Some boards serve an empty shell to obvious bot user agents.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub html: String,
    pub fetched_at: DateTime<Utc>,
}

/// Fetches one posting page under the configured timeout and redirect cap.
pub async fn fetch_posting(url: &str, config: &Config) -> Result<FetchedPage, AppError> {
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.fetch_timeout_secs))
        .redirect(redirect::Policy::limited(config.fetch_max_redirects))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| AppError::Fetch {
            url: url.to_string(),
            message: format!("failed to build HTTP client: {e}"),
        })?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AppError::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::Fetch {
            url: url.to_string(),
            message: format!("unexpected status {status}"),
        });
    }

    let html = response.text().await.map_err(|e| AppError::Fetch {
        url: url.to_string(),
        message: format!("failed to read body: {e}"),
    })?;

    debug!(url, bytes = html.len(), "fetched posting page");

    Ok(FetchedPage {
        url: url.to_string(),
        html,
        fetched_at: Utc::now(),
    })
}
