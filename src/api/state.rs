use std::sync::Arc;

use crate::core::AppConfig;
use crate::relay::Relay;

pub struct AppState {
    pub config: AppConfig,
    pub relay: Arc<Relay>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let relay = Arc::new(Relay::from_config(&config));
        Self { config, relay }
    }

    /// Use a pre-built relay, e.g. one wired to a different upstream.
    pub fn with_relay(config: AppConfig, relay: Relay) -> Self {
        Self {
            config,
            relay: Arc::new(relay),
        }
    }
}
