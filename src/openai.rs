//! OpenAI client configuration with sensible defaults.

use crate::error::{Result, SpeilError};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for OpenAI API requests (5 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Create an OpenAI client with an explicit API key and timeout.
///
/// Passing `None` (or an empty key) keeps the environment lookup done by
/// `OpenAIConfig::default`.
pub fn create_client_with(api_key: Option<&str>, timeout: Duration) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| SpeilError::Config(format!("Failed to create HTTP client: {}", e)))?;

    let config = match api_key.filter(|k| !k.is_empty()) {
        Some(key) => OpenAIConfig::default().with_api_key(key),
        None => OpenAIConfig::default(),
    };

    Ok(Client::with_config(config).with_http_client(http_client))
}
