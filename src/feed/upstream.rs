//! Upstream HTTP odds feed.
//!
//! One GET against a configured endpoint returning the raw event array.
//! No retry or backoff here; a failed fetch surfaces to the caller, which
//! decides whether to skip the tick or fail the request.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;

use crate::feed::OddsFeed;
use crate::models::RawEvent;

const REQUEST_TIMEOUT_SECS: u64 = 10;

pub struct UpstreamOddsFeed {
    client: reqwest::Client,
    url: String,
}

impl UpstreamOddsFeed {
    pub fn new(url: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build upstream odds client")?;

        Ok(Self { client, url })
    }

    /// Present only when ODDS_FEED_URL is configured
    pub fn from_env() -> Option<Self> {
        let url = std::env::var("ODDS_FEED_URL").ok()?;
        if url.trim().is_empty() {
            return None;
        }

        match Self::new(url) {
            Ok(feed) => Some(feed),
            Err(e) => {
                tracing::warn!("⚠️ Upstream odds feed disabled: {}", e);
                None
            }
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl OddsFeed for UpstreamOddsFeed {
    async fn fetch_events(&self) -> anyhow::Result<Vec<RawEvent>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("Failed to reach odds feed at {}", self.url))?
            .error_for_status()
            .context("Odds feed returned an error status")?;

        let events = response
            .json::<Vec<RawEvent>>()
            .await
            .context("Failed to decode odds feed response")?;

        Ok(events)
    }

    fn name(&self) -> &'static str {
        "upstream"
    }
}
