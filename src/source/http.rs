//! HTTP source for the remote corpus

use super::{DocumentSource, SourceError};
use anyhow::{Context, Result};
use std::time::Duration;

/// Default number of attempts before giving up
const DEFAULT_ATTEMPTS: usize = 3;

/// Fetches the corpus over HTTP(S)
pub struct HttpSource {
    url: String,
    attempts: usize,
    client: reqwest::Client,
}

impl HttpSource {
    /// Create a source for the given URL
    pub fn new(url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            url: url.to_string(),
            attempts: DEFAULT_ATTEMPTS,
            client,
        })
    }

    /// Set the number of attempts (at least one)
    pub fn with_attempts(mut self, attempts: usize) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    async fn fetch_once(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", self.url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            }
            .into());
        }

        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", self.url))?;

        if text.trim().is_empty() {
            return Err(SourceError::Empty {
                origin: self.url.clone(),
            }
            .into());
        }

        Ok(text)
    }
}

#[async_trait::async_trait]
impl DocumentSource for HttpSource {
    async fn fetch(&self) -> Result<String> {
        let mut last_error = None;

        for attempt in 0..self.attempts {
            match self.fetch_once().await {
                Ok(text) => {
                    tracing::info!(bytes = text.len(), "Fetched {}", self.url);
                    return Ok(text);
                }
                // Client errors will not improve on retry
                Err(e) if is_client_error(&e) => return Err(e),
                Err(e) => {
                    tracing::warn!("Fetch failed (attempt {}): {}", attempt + 1, e);
                    last_error = Some(e);

                    if attempt + 1 < self.attempts {
                        tokio::time::sleep(Duration::from_millis(500 * (attempt as u64 + 1)))
                            .await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("No fetch attempts were made")))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

fn is_client_error(error: &anyhow::Error) -> bool {
    matches!(
        error.downcast_ref::<SourceError>(),
        Some(SourceError::Status { status, .. }) if (400..500).contains(status)
    )
}
