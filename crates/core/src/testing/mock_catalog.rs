//! Mock catalog store for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::catalog::{
    CanonicalItem, CatalogError, CatalogQuery, CatalogStore, MemoryCatalog, Predicate,
};

/// A recorded catalog call for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCatalogCall {
    Insert { count: usize },
    Query { skip: usize, limit: Option<usize> },
    Count,
}

/// Catalog store backed by a [`MemoryCatalog`] with call recording and
/// error injection.
#[derive(Debug, Default)]
pub struct MockCatalogStore {
    inner: MemoryCatalog,
    /// Recorded calls.
    calls: Arc<RwLock<Vec<RecordedCatalogCall>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<CatalogError>>>,
}

impl MockCatalogStore {
    /// Create a new empty mock catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: CatalogError) {
        *self.next_error.write().await = Some(error);
    }

    /// Get all recorded calls.
    pub async fn recorded_calls(&self) -> Vec<RecordedCatalogCall> {
        self.calls.read().await.clone()
    }

    async fn take_error(&self) -> Option<CatalogError> {
        self.next_error.write().await.take()
    }

    async fn record(&self, call: RecordedCatalogCall) {
        self.calls.write().await.push(call);
    }
}

#[async_trait]
impl CatalogStore for MockCatalogStore {
    async fn insert(&self, items: Vec<CanonicalItem>) -> Result<Vec<CanonicalItem>, CatalogError> {
        self.record(RecordedCatalogCall::Insert { count: items.len() })
            .await;
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        self.inner.insert(items).await
    }

    async fn query(&self, query: &CatalogQuery) -> Result<Vec<CanonicalItem>, CatalogError> {
        self.record(RecordedCatalogCall::Query {
            skip: query.skip,
            limit: query.limit,
        })
        .await;
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        self.inner.query(query).await
    }

    async fn count(&self, predicate: &Predicate) -> Result<usize, CatalogError> {
        self.record(RecordedCatalogCall::Count).await;
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        self.inner.count(predicate).await
    }
}
