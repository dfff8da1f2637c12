pub mod catalog;
pub mod config;
pub mod feed;
pub mod metrics;
pub mod normalizer;
pub mod provider;
pub mod query;
pub mod sync;
pub mod testing;

pub use catalog::{
    CanonicalItem, CatalogError, CatalogQuery, CatalogStore, ItemType, MemoryCatalog, Predicate,
    SortField, SortOrder, SortSpec, TorrentInfo,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, FeedConfig,
    ProviderConfig, SanitizedConfig, ServerConfig,
};
pub use feed::{FeedError, FeedResponse, FeedSource, HttpFeedSource, RawListing};
pub use normalizer::normalize;
pub use provider::{Provider, ProviderInfo};
pub use query::{FetchFilters, FetchResult, QueryEngine, QueryError, PAGE_SIZE};
pub use sync::{SyncCoordinator, SyncError, SyncReport, SyncStatus};
