//! Fetch-once gate between the feed and the catalog.
//!
//! The first `ensure_synced` call spawns the sync pass as its own task and
//! installs a shared handle to it; every later or concurrent caller awaits
//! that same handle and sees the same outcome. The pass runs to completion
//! even if every caller goes away. A failed pass is never retried.

use std::sync::{Arc, OnceLock};
use std::time::Instant;

use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::{CatalogError, CatalogStore};
use crate::feed::{FeedError, FeedSource};
use crate::metrics;
use crate::normalizer::normalize;

/// Error from the sync pass, shared by every caller awaiting it.
#[derive(Debug, Clone, Error)]
pub enum SyncError {
    #[error("Feed fetch failed: {0}")]
    Feed(Arc<FeedError>),

    #[error("Catalog insert failed: {0}")]
    Store(Arc<CatalogError>),

    /// The sync task panicked or was aborted.
    #[error("Sync task ended abnormally: {0}")]
    Aborted(String),
}

/// Summary of a completed sync pass.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SyncReport {
    /// Raw listings in the feed.
    pub listings: usize,
    /// Canonical items inserted.
    pub items: usize,
    pub completed_at: DateTime<Utc>,
}

/// Observable state of the coordinator.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SyncStatus {
    NotStarted,
    InFlight,
    Completed(SyncReport),
    Failed { error: String },
}

type SyncOutcome = Result<SyncReport, SyncError>;
type SyncPass = Shared<BoxFuture<'static, SyncOutcome>>;

/// Runs the feed → normalizer → catalog pass at most once.
pub struct SyncCoordinator {
    feed: Arc<dyn FeedSource>,
    catalog: Arc<dyn CatalogStore>,
    pass: OnceLock<SyncPass>,
    /// Set by the sync task itself, so status does not depend on callers.
    outcome: Arc<OnceLock<SyncOutcome>>,
}

impl SyncCoordinator {
    pub fn new(feed: Arc<dyn FeedSource>, catalog: Arc<dyn CatalogStore>) -> Self {
        Self {
            feed,
            catalog,
            pass: OnceLock::new(),
            outcome: Arc::new(OnceLock::new()),
        }
    }

    /// Wait for the one sync pass, starting it if nobody has yet.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn ensure_synced(&self) -> Result<SyncReport, SyncError> {
        // The pass is installed before the first await, so racing callers
        // all attach to the same task.
        let pass = self.pass.get_or_init(|| self.start_pass()).clone();
        pass.await
    }

    /// Current state, without driving the pass.
    pub fn status(&self) -> SyncStatus {
        if self.pass.get().is_none() {
            return SyncStatus::NotStarted;
        }
        match self.outcome.get() {
            None => SyncStatus::InFlight,
            Some(Ok(report)) => SyncStatus::Completed(report.clone()),
            Some(Err(e)) => SyncStatus::Failed {
                error: e.to_string(),
            },
        }
    }

    fn start_pass(&self) -> SyncPass {
        let feed = Arc::clone(&self.feed);
        let catalog = Arc::clone(&self.catalog);
        let outcome = Arc::clone(&self.outcome);
        debug!(source = feed.name(), "Starting sync pass");

        let task = tokio::spawn(async move {
            let result = run_pass(feed, catalog).await;
            let _ = outcome.set(result.clone());
            result
        });

        let outcome = Arc::clone(&self.outcome);
        async move {
            match task.await {
                Ok(result) => result,
                Err(e) => {
                    let err = SyncError::Aborted(e.to_string());
                    warn!(error = %err, "Sync task did not finish");
                    let _ = outcome.set(Err(err.clone()));
                    Err(err)
                }
            }
        }
        .boxed()
        .shared()
    }
}

async fn run_pass(
    feed: Arc<dyn FeedSource>,
    catalog: Arc<dyn CatalogStore>,
) -> Result<SyncReport, SyncError> {
    let start = Instant::now();
    let result = sync_once(feed.as_ref(), catalog.as_ref()).await;
    let elapsed = start.elapsed().as_secs_f64();

    match &result {
        Ok(report) => {
            metrics::SYNC_DURATION
                .with_label_values(&["success"])
                .observe(elapsed);
            info!(
                source = feed.name(),
                listings = report.listings,
                items = report.items,
                "Catalog synced"
            );
        }
        Err(e) => {
            metrics::SYNC_DURATION
                .with_label_values(&["failed"])
                .observe(elapsed);
            warn!(source = feed.name(), error = %e, "Catalog sync failed");
        }
    }

    result
}

async fn sync_once(
    feed: &dyn FeedSource,
    catalog: &dyn CatalogStore,
) -> Result<SyncReport, SyncError> {
    let response = feed.fetch().await.map_err(|e| {
        metrics::FEED_FETCHES.with_label_values(&["failed"]).inc();
        SyncError::Feed(Arc::new(e))
    })?;
    metrics::FEED_FETCHES.with_label_values(&["success"]).inc();

    let listings = response.downloads.len();
    let items = normalize(response.downloads);
    let stored = catalog
        .insert(items)
        .await
        .map_err(|e| SyncError::Store(Arc::new(e)))?;

    Ok(SyncReport {
        listings,
        items: stored.len(),
        completed_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogQuery, MemoryCatalog};
    use crate::testing::{fixtures, MockCatalogStore, MockFeedSource};
    use std::time::Duration;

    #[tokio::test]
    async fn test_status_before_and_after_sync() {
        let feed = Arc::new(MockFeedSource::with_listings(vec![
            fixtures::raw_listing("tt1", "A", "720p"),
            fixtures::raw_listing("tt1", "A", "1080p"),
            fixtures::raw_listing("tt2", "B", "3D"),
        ]));
        let catalog = Arc::new(MemoryCatalog::new());
        let sync = SyncCoordinator::new(feed.clone(), catalog.clone());

        assert_eq!(sync.status(), SyncStatus::NotStarted);

        let report = sync.ensure_synced().await.unwrap();
        assert_eq!(report.listings, 3);
        assert_eq!(report.items, 1);
        assert!(matches!(sync.status(), SyncStatus::Completed(r) if r.items == 1));
        assert_eq!(catalog.len().await, 1);
    }

    #[tokio::test]
    async fn test_repeated_calls_fetch_once() {
        let feed = Arc::new(MockFeedSource::with_listings(vec![fixtures::raw_listing(
            "tt1", "A", "720p",
        )]));
        let catalog = Arc::new(MemoryCatalog::new());
        let sync = SyncCoordinator::new(feed.clone(), catalog.clone());

        let first = sync.ensure_synced().await.unwrap();
        let second = sync.ensure_synced().await.unwrap();

        assert_eq!(feed.fetch_count().await, 1);
        assert_eq!(first, second);
        // Items are not inserted twice
        assert_eq!(catalog.len().await, 1);
    }

    #[tokio::test]
    async fn test_later_listings_are_never_fetched() {
        let feed = Arc::new(MockFeedSource::with_listings(vec![fixtures::raw_listing(
            "tt1", "A", "720p",
        )]));
        let catalog = Arc::new(MemoryCatalog::new());
        let sync = SyncCoordinator::new(feed.clone(), catalog.clone());

        sync.ensure_synced().await.unwrap();
        feed.set_listings(fixtures::numbered_listings(5)).await;

        let report = sync.ensure_synced().await.unwrap();
        assert_eq!(report.items, 1);
        assert_eq!(feed.fetch_count().await, 1);
        assert_eq!(catalog.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_fetch() {
        let feed = Arc::new(
            MockFeedSource::with_listings(vec![fixtures::raw_listing("tt1", "A", "720p")])
                .paused(),
        );
        let catalog = Arc::new(MemoryCatalog::new());
        let sync = Arc::new(SyncCoordinator::new(feed.clone(), catalog));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let sync = Arc::clone(&sync);
                tokio::spawn(async move { sync.ensure_synced().await })
            })
            .collect();

        while sync.status() == SyncStatus::NotStarted {
            tokio::task::yield_now().await;
        }
        // The feed is held, so the pass cannot have finished
        assert_eq!(sync.status(), SyncStatus::InFlight);

        feed.release();
        let mut reports = Vec::new();
        for handle in handles {
            reports.push(handle.await.unwrap().unwrap());
        }

        assert_eq!(feed.fetch_count().await, 1);
        assert!(reports.windows(2).all(|w| w[0] == w[1]));
    }

    #[tokio::test]
    async fn test_cancelled_first_caller_does_not_stop_sync() {
        let feed = Arc::new(
            MockFeedSource::with_listings(vec![fixtures::raw_listing("tt1", "A", "720p")])
                .paused(),
        );
        let catalog = Arc::new(MemoryCatalog::new());
        let sync = SyncCoordinator::new(feed.clone(), catalog.clone());

        // The first caller gives up while the feed is still held
        let first =
            tokio::time::timeout(Duration::from_millis(20), sync.ensure_synced()).await;
        assert!(first.is_err());
        assert_eq!(sync.status(), SyncStatus::InFlight);

        // With no caller waiting, the pass still runs to completion
        feed.release();
        tokio::time::timeout(Duration::from_secs(1), async {
            while sync.status() == SyncStatus::InFlight {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
        assert!(matches!(sync.status(), SyncStatus::Completed(r) if r.items == 1));

        let report = sync.ensure_synced().await.unwrap();
        assert_eq!(report.items, 1);
        assert_eq!(feed.fetch_count().await, 1);
        assert_eq!(catalog.len().await, 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_sticky() {
        let feed = Arc::new(MockFeedSource::new());
        feed.set_next_error(FeedError::Timeout).await;
        let catalog = Arc::new(MemoryCatalog::new());
        let sync = SyncCoordinator::new(feed.clone(), catalog.clone());

        let first = sync.ensure_synced().await.unwrap_err();
        assert!(matches!(&first, SyncError::Feed(e) if matches!(**e, FeedError::Timeout)));

        // The mock would now succeed, but the coordinator never refetches
        let second = sync.ensure_synced().await.unwrap_err();
        assert_eq!(first.to_string(), second.to_string());
        assert_eq!(feed.fetch_count().await, 1);
        assert!(matches!(sync.status(), SyncStatus::Failed { .. }));
        assert!(catalog
            .query(&CatalogQuery::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_failure() {
        let feed = Arc::new(MockFeedSource::new().with_delay(Duration::from_millis(30)));
        feed.set_next_error(FeedError::Status {
            status: 503,
            body: "maintenance".to_string(),
        })
        .await;
        let sync = Arc::new(SyncCoordinator::new(
            feed.clone(),
            Arc::new(MemoryCatalog::new()),
        ));

        let (a, b, c) = tokio::join!(
            sync.ensure_synced(),
            sync.ensure_synced(),
            sync.ensure_synced()
        );

        assert_eq!(feed.fetch_count().await, 1);
        for result in [a, b, c] {
            assert!(result.unwrap_err().to_string().contains("503"));
        }
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let feed = Arc::new(MockFeedSource::with_listings(vec![fixtures::raw_listing(
            "tt1", "A", "720p",
        )]));
        let catalog = Arc::new(MockCatalogStore::new());
        catalog
            .set_next_error(CatalogError::Storage("disk full".to_string()))
            .await;
        let sync = SyncCoordinator::new(feed, catalog);

        let err = sync.ensure_synced().await.unwrap_err();
        assert!(matches!(err, SyncError::Store(_)));
        assert!(err.to_string().contains("disk full"));
    }
}
