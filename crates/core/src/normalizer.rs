//! Normalization of raw feed listings into canonical catalog items.
//!
//! The feed carries one listing per movie and quality. Listings sharing an
//! id collapse into a single item whose descriptive fields come from the
//! first listing seen; its `torrents` map is replaced by each later listing.

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex_lite::Regex;

use crate::catalog::{CanonicalItem, ItemType, TorrentInfo};
use crate::feed::RawListing;
use crate::metrics;

/// Listings with this quality are dropped.
pub const EXCLUDED_QUALITY: &str = "3D";

/// Synopsis used when a listing has none.
pub const DEFAULT_SYNOPSIS: &str = "No synopsis available.";

/// Bracketed substrings, edition/resolution markers and stray parentheses.
static TITLE_NOISE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\([^)]*\)|1080p|DIRECTORS CUT|EXTENDED|UNRATED|3D|[()]").unwrap()
});

/// Remove tag noise from a feed title.
///
/// Matching is case-sensitive and whitespace around removed tokens is kept.
pub fn strip_title_noise(title: &str) -> String {
    TITLE_NOISE.replace_all(title, "").into_owned()
}

/// Split a comma-delimited genre field, keeping each piece verbatim.
///
/// A missing or empty field gives an empty list rather than a single empty
/// genre, so items never carry a blank entry.
pub fn split_genres(genre: Option<&str>) -> Vec<String> {
    match genre {
        Some(g) if !g.is_empty() => g.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    }
}

fn torrent_entry(listing: &RawListing) -> BTreeMap<String, TorrentInfo> {
    let mut torrents = BTreeMap::new();
    torrents.insert(
        listing.quality.clone(),
        TorrentInfo {
            url: listing.torrent_url.clone(),
            size: listing.size_byte,
            filesize: listing.size.clone(),
            seed: 0,
            peer: 0,
        },
    );
    torrents
}

fn new_item(listing: RawListing, torrents: BTreeMap<String, TorrentInfo>) -> CanonicalItem {
    let synopsis = listing
        .synopsis
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_SYNOPSIS.to_string());

    CanonicalItem {
        title: strip_title_noise(&listing.movie_title_clean),
        genres: split_genres(listing.genre.as_deref()),
        id: listing.imdb_code,
        year: listing.movie_year,
        rating: listing.movie_rating,
        backdrop: listing.cover_image.clone(),
        poster: listing.cover_image,
        runtime: listing.runtime,
        synopsis,
        torrents,
        subtitle: BTreeMap::new(),
        trailer: false,
        item_type: ItemType::Movie,
    }
}

/// Normalize a full feed into canonical items.
///
/// Items come back in first-seen order. A repeated id does not add an item;
/// it replaces that item's `torrents` with the repeat's single quality.
pub fn normalize(raw: Vec<RawListing>) -> Vec<CanonicalItem> {
    let mut items: Vec<CanonicalItem> = Vec::new();
    let mut by_id: HashMap<String, usize> = HashMap::new();

    for listing in raw {
        if listing.quality == EXCLUDED_QUALITY {
            metrics::LISTINGS_SKIPPED.inc();
            continue;
        }
        metrics::LISTINGS_NORMALIZED.inc();

        let torrents = torrent_entry(&listing);

        match by_id.get(&listing.imdb_code) {
            Some(&index) => {
                items[index].torrents = torrents;
            }
            None => {
                by_id.insert(listing.imdb_code.clone(), items.len());
                items.push(new_item(listing, torrents));
            }
        }
    }

    items
}
