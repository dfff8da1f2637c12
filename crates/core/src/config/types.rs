use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::IpAddr;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Remote feed configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedConfig {
    /// Candidate feed URLs. Only the first one is fetched.
    #[serde(default = "default_url_list")]
    pub url_list: Vec<String>,
    /// Request timeout in milliseconds (default: 10000)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Skip TLS certificate verification for the feed host.
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url_list: default_url_list(),
            timeout_ms: default_timeout_ms(),
            accept_invalid_certs: false,
        }
    }
}

fn default_url_list() -> Vec<String> {
    vec!["http://butter.vodo.net/popcorn".to_string()]
}

fn default_timeout_ms() -> u64 {
    10_000
}

/// Provider identity, shown to hosts. Purely descriptive.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    #[serde(default = "default_name")]
    pub name: String,
    /// Name of the field that uniquely identifies an item.
    #[serde(default = "default_unique_id")]
    pub unique_id: String,
    #[serde(default = "default_tab_name")]
    pub tab_name: String,
    /// Sorter key to display label.
    #[serde(default = "default_sorters")]
    pub sorters: BTreeMap<String, String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            unique_id: default_unique_id(),
            tab_name: default_tab_name(),
            sorters: default_sorters(),
        }
    }
}

fn default_name() -> String {
    "vodo".to_string()
}

fn default_unique_id() -> String {
    "imdb_id".to_string()
}

fn default_tab_name() -> String {
    "Vodo".to_string()
}

fn default_sorters() -> BTreeMap<String, String> {
    [
        ("popularity", "Popularity"),
        ("updated", "Updated"),
        ("year", "Year"),
        ("alphabet", "Alphabetical"),
        ("rating", "Rating"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Sanitized config for API responses
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub feed: SanitizedFeedConfig,
    pub provider: ProviderConfig,
}

/// Feed config with query strings stripped from the URLs
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedFeedConfig {
    pub url_list: Vec<String>,
    pub timeout_ms: u64,
    pub accept_invalid_certs: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            feed: SanitizedFeedConfig {
                url_list: config
                    .feed
                    .url_list
                    .iter()
                    .map(|u| u.split('?').next().unwrap_or_default().to_string())
                    .collect(),
                timeout_ms: config.feed.timeout_ms,
                accept_invalid_certs: config.feed.accept_invalid_certs,
            },
            provider: config.provider.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.feed.url_list, vec!["http://butter.vodo.net/popcorn"]);
        assert_eq!(config.feed.timeout_ms, 10_000);
        assert!(!config.feed.accept_invalid_certs);
        assert_eq!(config.provider.name, "vodo");
        assert_eq!(config.provider.unique_id, "imdb_id");
        assert_eq!(config.provider.tab_name, "Vodo");
        assert_eq!(config.provider.sorters.len(), 5);
        assert_eq!(config.provider.sorters["alphabet"], "Alphabetical");
    }

    #[test]
    fn test_deserialize_feed_section() {
        let toml = r#"
[feed]
url_list = ["http://mirror.example/feed", "http://other.example/feed"]
timeout_ms = 2500
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.feed.url_list.len(), 2);
        assert_eq!(config.feed.url_list[0], "http://mirror.example/feed");
        assert_eq!(config.feed.timeout_ms, 2500);
    }

    #[test]
    fn test_deserialize_partial_provider_section() {
        let toml = r#"
[provider]
tab_name = "Free Movies"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.provider.tab_name, "Free Movies");
        assert_eq!(config.provider.name, "vodo");
        assert!(config.provider.sorters.contains_key("popularity"));
    }

    #[test]
    fn test_sanitized_config_strips_query_strings() {
        let mut config = Config::default();
        config.feed.url_list = vec!["https://feed.example/popcorn?token=abc".to_string()];

        let sanitized = SanitizedConfig::from(&config);
        assert_eq!(sanitized.feed.url_list, vec!["https://feed.example/popcorn"]);
        assert_eq!(sanitized.feed.timeout_ms, 10_000);
        assert_eq!(sanitized.server.port, 8080);
    }
}
