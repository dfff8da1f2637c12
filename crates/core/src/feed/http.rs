//! HTTP feed client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::FeedConfig;

use super::{FeedError, FeedResponse, FeedSource};

/// Fetches the feed from the first URL of the configured list.
pub struct HttpFeedSource {
    client: Client,
    url: String,
}

impl HttpFeedSource {
    /// Create a new feed client from configuration.
    pub fn new(config: &FeedConfig) -> Result<Self, FeedError> {
        let url = config
            .url_list
            .first()
            .filter(|u| !u.is_empty())
            .cloned()
            .ok_or_else(|| FeedError::NotConfigured("feed.url_list is empty".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self { client, url })
    }

    /// The URL this source fetches.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self) -> Result<FeedResponse, FeedError> {
        debug!(url = %self.url, "Requesting feed");

        let response = self.client.get(&self.url).send().await.map_err(|e| {
            if e.is_timeout() {
                FeedError::Timeout
            } else {
                FeedError::Http(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let feed: FeedResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                FeedError::Timeout
            } else {
                FeedError::Parse(e.to_string())
            }
        })?;

        debug!(
            url = %self.url,
            listings = feed.downloads.len(),
            "Feed received"
        );

        Ok(feed)
    }
}
