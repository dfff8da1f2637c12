//! Mock feed source for testing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, RwLock};

use crate::feed::{FeedError, FeedResponse, FeedSource, RawListing};

/// Mock implementation of the FeedSource trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable listings
/// - Count fetches for fetch-once assertions
/// - Simulate failures and slow responses
/// - Hold fetches until the test releases them
///
/// # Example
///
/// ```rust,ignore
/// use vodo_core::testing::{MockFeedSource, fixtures};
///
/// let feed = MockFeedSource::with_listings(vec![
///     fixtures::raw_listing("tt1234567", "Pioneer One", "720p"),
/// ]);
///
/// let response = feed.fetch().await?;
/// assert_eq!(response.downloads.len(), 1);
/// assert_eq!(feed.fetch_count().await, 1);
/// ```
#[derive(Debug, Default)]
pub struct MockFeedSource {
    /// Listings returned by every successful fetch.
    listings: Arc<RwLock<Vec<RawListing>>>,
    /// Number of fetches performed.
    fetches: Arc<RwLock<usize>>,
    /// If set, the next fetch will fail with this error.
    next_error: Arc<RwLock<Option<FeedError>>>,
    /// Simulated response latency.
    delay: Option<Duration>,
    /// If set, fetches wait here until `release` is called.
    gate: Option<Arc<Notify>>,
}

impl MockFeedSource {
    /// Create a mock feed with no listings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock feed serving the given listings.
    pub fn with_listings(listings: Vec<RawListing>) -> Self {
        Self {
            listings: Arc::new(RwLock::new(listings)),
            ..Self::default()
        }
    }

    /// Delay every fetch by `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Hold every fetch until `release` is called.
    pub fn paused(mut self) -> Self {
        self.gate = Some(Arc::new(Notify::new()));
        self
    }

    /// Let one held fetch proceed. A release before the fetch arrives is
    /// remembered.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    /// Replace the served listings.
    pub async fn set_listings(&self, listings: Vec<RawListing>) {
        *self.listings.write().await = listings;
    }

    /// Number of fetches performed so far.
    pub async fn fetch_count(&self) -> usize {
        *self.fetches.read().await
    }

    /// Configure the next fetch to fail with the given error.
    pub async fn set_next_error(&self, error: FeedError) {
        *self.next_error.write().await = Some(error);
    }
}

#[async_trait]
impl FeedSource for MockFeedSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self) -> Result<FeedResponse, FeedError> {
        *self.fetches.write().await += 1;

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        Ok(FeedResponse {
            downloads: self.listings.read().await.clone(),
        })
    }
}
