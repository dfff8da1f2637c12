//! Wire types for the remote listing feed.

use serde::{Deserialize, Deserializer, Serialize};

/// Top-level feed document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FeedResponse {
    /// Every listing in the feed; one movie may appear once per quality.
    #[serde(default)]
    pub downloads: Vec<RawListing>,
}

/// One entry from the remote feed.
///
/// Feed records are loosely typed: numeric fields arrive either as JSON
/// numbers or as numeric strings, and most fields can be missing entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct RawListing {
    /// Quality label (e.g. "720p", "1080p", "3D").
    pub quality: String,
    /// External identifier, used as the canonical item id.
    pub imdb_code: String,
    #[serde(default)]
    pub torrent_url: String,
    /// Size in bytes.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub size_byte: Option<u64>,
    /// Human-readable size (e.g. "1.4 GB").
    #[serde(default)]
    pub size: Option<String>,
    /// Title, possibly carrying resolution/edition tags.
    #[serde(default)]
    pub movie_title_clean: String,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub movie_year: Option<u32>,
    /// Comma-delimited genre list.
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub movie_rating: Option<f64>,
    #[serde(default)]
    pub cover_image: Option<String>,
    /// Runtime in minutes.
    #[serde(default, deserialize_with = "lenient_u32")]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub synopsis: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(serde_json::Number),
    Text(String),
}

impl NumberOrString {
    fn as_f64(&self) -> Option<f64> {
        match self {
            NumberOrString::Number(n) => n.as_f64(),
            NumberOrString::Text(s) => s.trim().parse().ok(),
        }
    }

    fn as_u64(&self) -> Option<u64> {
        match self {
            NumberOrString::Number(n) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
            NumberOrString::Text(s) => {
                let s = s.trim();
                s.parse::<u64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().filter(|f| *f >= 0.0).map(|f| f as u64))
            }
        }
    }
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<NumberOrString>::deserialize(deserializer)?.and_then(|v| v.as_u64()))
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_u64(deserializer)?.and_then(|v| u32::try_from(v).ok()))
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<NumberOrString>::deserialize(deserializer)?.and_then(|v| v.as_f64()))
}
