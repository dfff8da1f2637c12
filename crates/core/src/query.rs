//! Paginated catalog queries on behalf of a host.
//!
//! Every fetch waits for the one sync pass, then reads a single page of
//! `PAGE_SIZE` items from the catalog.

use std::sync::Arc;

use regex_lite::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::catalog::{
    CanonicalItem, CatalogError, CatalogQuery, CatalogStore, ItemType, Predicate, SortField,
    SortOrder, SortSpec,
};
use crate::metrics;
use crate::sync::{SyncCoordinator, SyncError};

/// Items per page.
pub const PAGE_SIZE: usize = 50;

/// Sort key used when the host asks for popularity or gives no sorter.
pub const DEFAULT_SORTER: &str = "rating";

/// Sorter key that falls back to `DEFAULT_SORTER`.
const POPULARITY_SORTER: &str = "popularity";

/// Filters a host sends with a fetch.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FetchFilters {
    /// Free-text title search.
    #[serde(default)]
    pub keywords: Option<String>,
    /// Exact genre element.
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub order: Option<SortOrder>,
    #[serde(default)]
    pub sorter: Option<String>,
    /// 1-based page number. Defaults to 1.
    #[serde(default)]
    pub page: Option<u32>,
}

/// One page of results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FetchResult {
    pub results: Vec<CanonicalItem>,
    /// True whenever this page is non-empty.
    #[serde(rename = "hasMore")]
    pub has_more: bool,
}

/// Errors returned by a fetch.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("Catalog query failed: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Invalid keywords: {0}")]
    InvalidKeywords(String),
}

/// Build the title pattern for a keyword search.
///
/// Each whitespace character matches one or more whitespace characters;
/// everything else matches literally, ignoring case.
pub fn keyword_pattern(keywords: &str) -> Result<Regex, QueryError> {
    let mut pattern = String::with_capacity(keywords.len() * 2);
    for c in keywords.chars() {
        if c.is_whitespace() {
            pattern.push_str(r"\s+");
        } else {
            let mut buf = [0u8; 4];
            pattern.push_str(&regex_lite::escape(c.encode_utf8(&mut buf)));
        }
    }

    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| QueryError::InvalidKeywords(e.to_string()))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl FetchFilters {
    /// Translate the filters into a catalog query for one page.
    pub fn to_catalog_query(&self) -> Result<CatalogQuery, QueryError> {
        let mut predicate = Predicate::All;

        if let Some(keywords) = non_empty(&self.keywords) {
            predicate = predicate.and(Predicate::TitleMatches(keyword_pattern(keywords)?));
        }

        if let Some(genre) = non_empty(&self.genre) {
            predicate = predicate.and(Predicate::HasGenre(genre.to_string()));
        }

        let sorter = match non_empty(&self.sorter) {
            Some(s) if s != POPULARITY_SORTER => s,
            _ => DEFAULT_SORTER,
        };
        // Keys without a backing field leave results in insertion order.
        let sort = SortField::from_key(sorter).map(|field| SortSpec {
            field,
            order: self.order.unwrap_or_default(),
        });

        let page = self.page.unwrap_or(1).max(1) as usize;

        Ok(CatalogQuery {
            predicate,
            sort,
            skip: (page - 1).saturating_mul(PAGE_SIZE),
            limit: Some(PAGE_SIZE),
        })
    }
}

/// Serves pages from the catalog once the sync pass has finished.
pub struct QueryEngine {
    sync: Arc<SyncCoordinator>,
    catalog: Arc<dyn CatalogStore>,
}

impl QueryEngine {
    pub fn new(sync: Arc<SyncCoordinator>, catalog: Arc<dyn CatalogStore>) -> Self {
        Self { sync, catalog }
    }

    /// Fetch one page of items matching `filters`.
    pub async fn fetch(&self, filters: &FetchFilters) -> Result<FetchResult, QueryError> {
        self.sync.ensure_synced().await?;

        let query = filters.to_catalog_query()?;
        let mut results = match self.catalog.query(&query).await {
            Ok(results) => results,
            Err(e) => {
                metrics::CATALOG_QUERIES.with_label_values(&["failed"]).inc();
                return Err(e.into());
            }
        };

        for item in &mut results {
            item.item_type = ItemType::Movie;
        }

        let has_more = !results.is_empty();
        let label = if has_more { "hit" } else { "empty" };
        metrics::CATALOG_QUERIES.with_label_values(&[label]).inc();

        debug!(
            page = filters.page.unwrap_or(1),
            skip = query.skip,
            returned = results.len(),
            "Catalog page served"
        );

        Ok(FetchResult { results, has_more })
    }

    /// Return the host's previously known data for an item unchanged.
    ///
    /// The feed carries no extra per-item detail, so there is nothing to
    /// look up.
    pub fn detail<T>(&self, id: &str, previous: T) -> T {
        debug!(id, "Detail pass-through");
        previous
    }

    /// Count catalog items, waiting for the sync pass first.
    pub async fn total(&self) -> Result<usize, QueryError> {
        self.sync.ensure_synced().await?;
        Ok(self.catalog.count(&Predicate::All).await?)
    }
}
