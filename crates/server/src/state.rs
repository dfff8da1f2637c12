use vodo_core::{Config, Provider, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    provider: Provider,
}

impl AppState {
    pub fn new(config: Config, provider: Provider) -> Self {
        Self { config, provider }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }
}
