//! HTTP fetch capability.
//!
//! A thin wrapper over `reqwest` that turns non-2xx responses into errors,
//! caps body size, and retries connection-level failures a fixed number of
//! times at a fixed interval. Status errors are never retried.

use std::time::Duration;

use log::{debug, trace};
use tokio_retry::strategy::FixedInterval;
use tokio_retry::RetryIf;

use crate::config::{MAX_BODY_CHARS, RETRY_INTERVAL_MS, RETRY_MAX_ATTEMPTS};
use crate::error_handling::FetchError;
use crate::utils::truncate_chars;

/// A successfully fetched page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub url: String,
    pub status: u16,
    pub body: String,
    pub content_type: Option<String>,
}

/// HTTP GET with status checking and a small connection-level retry budget.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    max_attempts: usize,
    retry_interval: Duration,
    max_body_chars: usize,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            max_attempts: RETRY_MAX_ATTEMPTS,
            retry_interval: Duration::from_millis(RETRY_INTERVAL_MS),
            max_body_chars: MAX_BODY_CHARS,
        }
    }

    /// Overrides the retry budget (total attempts, including the first).
    pub fn with_retry_policy(mut self, max_attempts: usize, interval: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.retry_interval = interval;
        self
    }

    pub fn with_max_body_chars(mut self, max_body_chars: usize) -> Self {
        self.max_body_chars = max_body_chars;
        self
    }

    /// Fetches `url`, failing on network errors and non-2xx statuses.
    ///
    /// Bodies longer than the configured cap are truncated, not rejected.
    pub async fn get(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let strategy = FixedInterval::new(self.retry_interval).take(self.max_attempts - 1);
        RetryIf::spawn(
            strategy,
            || self.get_once(url),
            |e: &FetchError| {
                let retry = e.is_transient();
                if retry {
                    debug!("Retrying {url} after transient failure: {e}");
                }
                retry
            },
        )
        .await
    }

    /// Fetches `url` and parses the body as JSON.
    pub async fn get_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        let page = self.get(url).await?;
        serde_json::from_str(&page.body).map_err(|source| FetchError::Json {
            url: url.to_string(),
            source,
        })
    }

    async fn get_once(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        trace!("Response version for {url}: {:?}", response.version());

        let mut body = response.text().await.map_err(transport)?;
        if body.len() > self.max_body_chars {
            debug!("Truncating large body from {url}: {} bytes", body.len());
            truncate_chars(&mut body, self.max_body_chars);
        }

        Ok(FetchedPage {
            url: final_url,
            status: status.as_u16(),
            body,
            content_type,
        })
    }
}
