//! Movie catalog - the cache of normalized feed items.
//!
//! Items are inserted once per sync pass and queried many times.

mod memory;
mod types;

pub use memory::MemoryCatalog;
pub use types::*;

use async_trait::async_trait;

/// Trait for catalog storage.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Append items to the catalog.
    ///
    /// Id uniqueness is not enforced here; the normalizer guarantees it
    /// within one pass.
    ///
    /// Returns the stored items.
    async fn insert(&self, items: Vec<CanonicalItem>) -> Result<Vec<CanonicalItem>, CatalogError>;

    /// Filter, sort and paginate catalog items.
    async fn query(&self, query: &CatalogQuery) -> Result<Vec<CanonicalItem>, CatalogError>;

    /// Count items matching a predicate.
    async fn count(&self, predicate: &Predicate) -> Result<usize, CatalogError>;
}
