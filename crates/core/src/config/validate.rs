use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Feed URL list is non-empty and its first entry is http(s)
/// - Feed timeout is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    let Some(url) = config.feed.url_list.first() else {
        return Err(ConfigError::ValidationError(
            "feed.url_list must contain at least one URL".to_string(),
        ));
    };

    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::ValidationError(format!(
            "feed.url_list[0] must be an http(s) URL, got '{}'",
            url
        )));
    }

    if config.feed.timeout_ms == 0 {
        return Err(ConfigError::ValidationError(
            "feed.timeout_ms cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let mut config = Config::default();
        config.server.port = 0;
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_empty_url_list_fails() {
        let mut config = Config::default();
        config.feed.url_list.clear();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("url_list"));
    }

    #[test]
    fn test_validate_non_http_url_fails() {
        let mut config = Config::default();
        config.feed.url_list = vec!["ftp://feed.example/popcorn".to_string()];
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_only_first_url_checked() {
        let mut config = Config::default();
        config.feed.url_list = vec![
            "https://feed.example/popcorn".to_string(),
            "not a url".to_string(),
        ];
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_zero_timeout_fails() {
        let mut config = Config::default();
        config.feed.timeout_ms = 0;
        assert!(validate_config(&config).is_err());
    }
}
