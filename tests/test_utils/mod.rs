//! Test utilities for integration tests
#![allow(dead_code)]
use std::sync::Arc;

use axum::{Router, body::Body};

use vision::api::AppState;
use vision::api::app;
use vision::core::AppConfig;
use vision::relay::Relay;

/// Config pointing the relay at `upstream_url`, usually a
/// `mockito` server.
pub fn test_config(upstream_url: &str) -> AppConfig {
    AppConfig {
        openai_api_hostname: upstream_url.to_string(),
        openai_api_key: Some(String::from("test-api-key")),
        openai_model: String::from("gpt-4o-mini"),
        system_message: String::from("You are a helpful assistant."),
        upstream_timeout_secs: 5,
        static_dir: String::from("./"),
    }
}

/// Creates a test application router for the given config.
pub fn test_app(config: AppConfig) -> Router {
    app(Arc::new(AppState::new(config)))
}

/// Creates a test application router around a pre-built relay.
pub fn test_app_with_relay(config: AppConfig, relay: Relay) -> Router {
    app(Arc::new(AppState::with_relay(config, relay)))
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not utf8")
}
