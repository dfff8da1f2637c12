//! In-memory catalog implementation.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{CanonicalItem, CatalogError, CatalogQuery, CatalogStore, Predicate, SortOrder};
use crate::metrics;

/// Catalog held in process memory for the lifetime of its owner.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    items: RwLock<Vec<CanonicalItem>>,
}

impl MemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored items.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn insert(&self, items: Vec<CanonicalItem>) -> Result<Vec<CanonicalItem>, CatalogError> {
        let mut stored = self.items.write().await;
        stored.extend(items.iter().cloned());
        metrics::ITEMS_STORED.inc_by(items.len() as u64);
        debug!(inserted = items.len(), total = stored.len(), "Catalog insert");
        Ok(items)
    }

    async fn query(&self, query: &CatalogQuery) -> Result<Vec<CanonicalItem>, CatalogError> {
        let items = self.items.read().await;

        let mut matched: Vec<&CanonicalItem> = items
            .iter()
            .filter(|item| query.predicate.matches(item))
            .collect();

        if let Some(spec) = query.sort {
            // Stable sort: equal keys keep insertion order in both directions.
            matched.sort_by(|a, b| match spec.order {
                SortOrder::Ascending => spec.field.compare(a, b),
                SortOrder::Descending => spec.field.compare(b, a),
            });
        }

        let page = matched
            .into_iter()
            .skip(query.skip)
            .take(query.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok(page)
    }

    async fn count(&self, predicate: &Predicate) -> Result<usize, CatalogError> {
        let items = self.items.read().await;
        Ok(items.iter().filter(|item| predicate.matches(item)).count())
    }
}
