//! The Vodo content provider.
//!
//! A `Provider` owns its catalog and wires the feed, sync pass and query
//! engine together. Each provider has its own cache and fetches the feed at
//! most once.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogStore, MemoryCatalog};
use crate::config::{Config, ProviderConfig};
use crate::feed::{FeedError, FeedSource, HttpFeedSource};
use crate::query::{FetchFilters, FetchResult, QueryEngine, QueryError};
use crate::sync::{SyncCoordinator, SyncStatus};

/// Descriptive provider metadata exposed to hosts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    pub name: String,
    /// Item field that uniquely identifies an item.
    pub unique_id: String,
    pub tab_name: String,
    /// Sorter key to display label.
    pub sorters: BTreeMap<String, String>,
}

impl From<&ProviderConfig> for ProviderInfo {
    fn from(config: &ProviderConfig) -> Self {
        Self {
            name: config.name.clone(),
            unique_id: config.unique_id.clone(),
            tab_name: config.tab_name.clone(),
            sorters: config.sorters.clone(),
        }
    }
}

pub struct Provider {
    info: ProviderInfo,
    sync: Arc<SyncCoordinator>,
    engine: QueryEngine,
}

impl Provider {
    /// Create a provider reading from `feed` into a fresh in-memory catalog.
    pub fn with_feed(config: &ProviderConfig, feed: Arc<dyn FeedSource>) -> Self {
        Self::with_parts(config, feed, Arc::new(MemoryCatalog::new()))
    }

    /// Create a provider over an explicit catalog store.
    pub fn with_parts(
        config: &ProviderConfig,
        feed: Arc<dyn FeedSource>,
        catalog: Arc<dyn CatalogStore>,
    ) -> Self {
        let sync = Arc::new(SyncCoordinator::new(feed, Arc::clone(&catalog)));
        let engine = QueryEngine::new(Arc::clone(&sync), catalog);
        Self {
            info: ProviderInfo::from(config),
            sync,
            engine,
        }
    }

    /// Create a provider fetching the configured HTTP feed.
    pub fn from_config(config: &Config) -> Result<Self, FeedError> {
        let feed = HttpFeedSource::new(&config.feed)?;
        Ok(Self::with_feed(&config.provider, Arc::new(feed)))
    }

    pub fn info(&self) -> &ProviderInfo {
        &self.info
    }

    /// Fetch one page of movies. The first call triggers the sync pass.
    pub async fn fetch(&self, filters: &FetchFilters) -> Result<FetchResult, QueryError> {
        self.engine.fetch(filters).await
    }

    /// Return `previous` unchanged.
    pub fn detail<T>(&self, id: &str, previous: T) -> T {
        self.engine.detail(id, previous)
    }

    /// Current sync state, without starting a pass.
    pub fn sync_status(&self) -> SyncStatus {
        self.sync.status()
    }

    /// Number of cached items, waiting for the sync pass first.
    pub async fn total(&self) -> Result<usize, QueryError> {
        self.engine.total().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, MockFeedSource};

    #[test]
    fn test_info_serializes_camel_case() {
        let info = ProviderInfo::from(&ProviderConfig::default());
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["name"], "vodo");
        assert_eq!(json["uniqueId"], "imdb_id");
        assert_eq!(json["tabName"], "Vodo");
        assert_eq!(json["sorters"]["rating"], "Rating");
    }

    #[tokio::test]
    async fn test_providers_do_not_share_a_cache() {
        let feed_a = Arc::new(MockFeedSource::with_listings(fixtures::numbered_listings(2)));
        let feed_b = Arc::new(MockFeedSource::with_listings(fixtures::numbered_listings(5)));
        let a = Provider::with_feed(&ProviderConfig::default(), feed_a.clone());
        let b = Provider::with_feed(&ProviderConfig::default(), feed_b.clone());

        assert_eq!(a.total().await.unwrap(), 2);
        assert_eq!(b.total().await.unwrap(), 5);
        assert_eq!(feed_a.fetch_count().await, 1);
        assert_eq!(feed_b.fetch_count().await, 1);
    }

    #[tokio::test]
    async fn test_sync_status_follows_first_fetch() {
        let feed = Arc::new(MockFeedSource::with_listings(fixtures::numbered_listings(3)));
        let provider = Provider::with_feed(&ProviderConfig::default(), feed);

        assert_eq!(provider.sync_status(), SyncStatus::NotStarted);
        provider.fetch(&FetchFilters::default()).await.unwrap();
        assert!(matches!(provider.sync_status(), SyncStatus::Completed(r) if r.items == 3));
    }

    #[test]
    fn test_from_config_requires_feed_url() {
        let mut config = Config::default();
        config.feed.url_list.clear();
        assert!(matches!(
            Provider::from_config(&config),
            Err(FeedError::NotConfigured(_))
        ));
    }
}
