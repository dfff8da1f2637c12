//! Remote listing feed.
//!
//! The feed is a single JSON document (`{"downloads": [...]}`) listing every
//! available torrent, one entry per movie and quality.

mod http;
mod types;

pub use http::HttpFeedSource;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when fetching the feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The request did not complete within the configured timeout.
    #[error("Feed request timed out")]
    Timeout,

    /// Feed endpoint answered with a non-success status.
    #[error("Feed returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Failed to parse the feed body.
    #[error("Failed to parse feed: {0}")]
    Parse(String),

    /// No usable feed URL.
    #[error("Feed not configured: {0}")]
    NotConfigured(String),
}

/// A source of raw feed listings.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &str;

    /// Fetch the full feed document.
    async fn fetch(&self) -> Result<FeedResponse, FeedError>;
}
