//! HTTP feed source backed by `reqwest`.

use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::types::Feed;

use super::{DEFAULT_TIMEOUT, FeedSource, decode};

/// Fetches the feed with a single GET per call. No retry.
#[derive(Debug, Clone)]
pub struct HttpFeed {
    client: reqwest::Client,
    url: String,
}

impl HttpFeed {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { client, url: url.into() })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl FeedSource for HttpFeed {
    async fn fetch(&self) -> Result<Feed> {
        let t0 = Instant::now();
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %self.url, %status, "feed request rejected");
            return Err(Error::Status(status));
        }

        let body = response.text().await?;
        let feed = decode(&body)?;
        info!(
            url = %self.url,
            bytes = body.len(),
            count = feed.metadata.count,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "feed fetched"
        );
        Ok(feed)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
