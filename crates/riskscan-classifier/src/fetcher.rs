//! Page fetching
//!
//! Fetch failures are final for the subject; nothing here retries.

use async_trait::async_trait;
use riskscan_core::{Error, Result};
use std::time::Duration;
use tracing::debug;

/// Identifying client header sent with every page request
pub const DEFAULT_USER_AGENT: &str = "riskscan/0.1 (AI risk classification research)";

/// Default per-request timeout for page fetches
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Source of raw page markup
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the page body, failing on transport errors and non-2xx statuses
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// HTTP page fetcher backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with a fixed user agent and timeout
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!(url, "fetching page");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::fetch(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(status.as_u16(), body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::fetch(format!("{}: failed to read body: {}", url, e)))?;

        debug!(url, bytes = body.len(), "page fetched");
        Ok(body)
    }
}
