//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the feed and catalog traits,
//! allowing the sync and query paths to be tested without a network.
//!
//! # Example
//!
//! ```rust,ignore
//! use vodo_core::testing::{MockFeedSource, fixtures};
//!
//! let feed = MockFeedSource::with_listings(vec![
//!     fixtures::raw_listing("tt1234567", "Pioneer One (2010)", "720p"),
//! ]);
//! let provider = Provider::with_feed(&ProviderConfig::default(), Arc::new(feed));
//! ```

mod mock_catalog;
mod mock_feed;

pub use mock_catalog::{MockCatalogStore, RecordedCatalogCall};
pub use mock_feed::MockFeedSource;

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::collections::BTreeMap;

    use crate::catalog::{CanonicalItem, ItemType, TorrentInfo};
    use crate::feed::RawListing;

    /// Create a raw feed listing with reasonable defaults.
    pub fn raw_listing(imdb_code: &str, title: &str, quality: &str) -> RawListing {
        RawListing {
            quality: quality.to_string(),
            imdb_code: imdb_code.to_string(),
            torrent_url: format!("http://feed.example/{}/{}.torrent", imdb_code, quality),
            size_byte: Some(734_003_200),
            size: Some("700 MB".to_string()),
            movie_title_clean: title.to_string(),
            movie_year: Some(2010),
            genre: Some("Drama,Sci-Fi".to_string()),
            movie_rating: Some(7.0),
            cover_image: Some(format!("http://feed.example/{}/cover.jpg", imdb_code)),
            runtime: Some(90),
            synopsis: Some(format!("A film called {}.", title)),
        }
    }

    /// Create a canonical item with a single 720p torrent.
    pub fn canonical_item(id: &str, title: &str) -> CanonicalItem {
        let mut torrents = BTreeMap::new();
        torrents.insert(
            "720p".to_string(),
            TorrentInfo {
                url: format!("http://feed.example/{}/720p.torrent", id),
                size: Some(734_003_200),
                filesize: Some("700 MB".to_string()),
                seed: 0,
                peer: 0,
            },
        );

        CanonicalItem {
            id: id.to_string(),
            title: title.to_string(),
            year: Some(2010),
            genres: vec!["Drama".to_string()],
            rating: Some(7.0),
            poster: None,
            backdrop: None,
            runtime: Some(90),
            synopsis: "No synopsis available.".to_string(),
            torrents,
            subtitle: BTreeMap::new(),
            trailer: false,
            item_type: ItemType::Movie,
        }
    }

    /// Create `count` raw listings with ids `tt0000001..` and ratings equal
    /// to their index, one 720p listing each.
    pub fn numbered_listings(count: usize) -> Vec<RawListing> {
        (1..=count)
            .map(|i| {
                let mut listing =
                    raw_listing(&format!("tt{:07}", i), &format!("Movie {}", i), "720p");
                listing.movie_rating = Some(i as f64);
                listing
            })
            .collect()
    }
}
