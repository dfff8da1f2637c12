//! Types for the movie catalog.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use regex_lite::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Kind tag stamped on every catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    #[default]
    Movie,
}

/// One torrent variant of a movie.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TorrentInfo {
    /// .torrent download URL.
    pub url: String,
    /// Size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Human-readable size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filesize: Option<String>,
    /// Always 0: torrent health is not computed.
    pub seed: u32,
    /// Always 0: torrent health is not computed.
    pub peer: u32,
}

/// A deduplicated, normalized movie record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CanonicalItem {
    /// External identifier (IMDb code). Primary key.
    #[serde(rename = "imdb_id")]
    pub id: String,
    /// Title with resolution/edition tags removed.
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backdrop: Option<String>,
    /// Runtime in minutes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u32>,
    pub synopsis: String,
    /// Quality label to torrent. Holds only the most recently seen quality.
    pub torrents: BTreeMap<String, TorrentInfo>,
    /// Always empty: subtitles are not looked up.
    #[serde(default)]
    pub subtitle: BTreeMap<String, String>,
    /// Always false: trailers are not looked up.
    #[serde(default)]
    pub trailer: bool,
    #[serde(rename = "type", default)]
    pub item_type: ItemType,
}

/// Filter over catalog items.
#[derive(Debug, Clone, Default)]
pub enum Predicate {
    /// Matches everything.
    #[default]
    All,
    IdEquals(String),
    TitleEquals(String),
    YearEquals(u32),
    /// Some element of `genres` equals the value exactly.
    HasGenre(String),
    /// `title` matches the pattern.
    TitleMatches(Regex),
    /// Every inner predicate matches.
    And(Vec<Predicate>),
}

impl Predicate {
    /// Check whether an item satisfies this predicate.
    pub fn matches(&self, item: &CanonicalItem) -> bool {
        match self {
            Predicate::All => true,
            Predicate::IdEquals(id) => item.id == *id,
            Predicate::TitleEquals(title) => item.title == *title,
            Predicate::YearEquals(year) => item.year == Some(*year),
            Predicate::HasGenre(genre) => item.genres.iter().any(|g| g == genre),
            Predicate::TitleMatches(re) => re.is_match(&item.title),
            Predicate::And(inner) => inner.iter().all(|p| p.matches(item)),
        }
    }

    /// Combine with another predicate, flattening `All` away.
    pub fn and(self, other: Predicate) -> Predicate {
        match (self, other) {
            (Predicate::All, p) | (p, Predicate::All) => p,
            (Predicate::And(mut a), Predicate::And(b)) => {
                a.extend(b);
                Predicate::And(a)
            }
            (Predicate::And(mut a), p) => {
                a.push(p);
                Predicate::And(a)
            }
            (p, q) => Predicate::And(vec![p, q]),
        }
    }
}

/// Field a catalog query can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Id,
    Title,
    Year,
    Rating,
    Runtime,
}

impl SortField {
    /// Resolve a user-facing sorter key.
    ///
    /// Returns `None` for keys with no backing field (e.g. "updated").
    pub fn from_key(key: &str) -> Option<SortField> {
        match key {
            "imdb_id" | "id" => Some(SortField::Id),
            "alphabet" | "title" => Some(SortField::Title),
            "year" => Some(SortField::Year),
            "rating" => Some(SortField::Rating),
            "runtime" => Some(SortField::Runtime),
            _ => None,
        }
    }

    /// Ascending comparison of two items on this field.
    ///
    /// Items missing the field order before items that have it.
    pub fn compare(&self, a: &CanonicalItem, b: &CanonicalItem) -> Ordering {
        match self {
            SortField::Id => a.id.cmp(&b.id),
            SortField::Title => a.title.cmp(&b.title),
            SortField::Year => a.year.cmp(&b.year),
            SortField::Runtime => a.runtime.cmp(&b.runtime),
            SortField::Rating => match (a.rating, b.rating) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                (x, y) => x.is_some().cmp(&y.is_some()),
            },
        }
    }
}

/// Sort direction.
///
/// Accepts `1` / `-1` (as sent by hosts) or `"asc"` / `"desc"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl<'de> Deserialize<'de> for SortOrder {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Int(n) if n >= 0 => Ok(SortOrder::Ascending),
            Raw::Int(_) => Ok(SortOrder::Descending),
            Raw::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "1" | "asc" | "ascending" => Ok(SortOrder::Ascending),
                "-1" | "desc" | "descending" => Ok(SortOrder::Descending),
                other => Err(serde::de::Error::custom(format!(
                    "invalid sort order '{}'",
                    other
                ))),
            },
        }
    }
}

/// Sort key and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

/// Query against the catalog.
#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
    pub predicate: Predicate,
    /// `None` keeps insertion order.
    pub sort: Option<SortSpec>,
    /// Matching items to skip after sorting.
    pub skip: usize,
    /// Maximum items to return; `None` for all.
    pub limit: Option<usize>,
}

/// Errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Storage error: {0}")]
    Storage(String),
}
