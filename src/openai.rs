//! OpenAI client construction.

use crate::config::Settings;
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Create an OpenAI client with the configured request timeout.
///
/// Reads `OPENAI_API_KEY` from the environment. The timeout bounds each
/// chat-completion call so a hung model request cannot stall the whole
/// exchange indefinitely.
pub fn create_client(settings: &Settings) -> Client<OpenAIConfig> {
    create_client_with_timeout(Duration::from_secs(settings.model.timeout_secs))
}

/// Create an OpenAI client with a custom timeout.
pub fn create_client_with_timeout(timeout: Duration) -> Client<OpenAIConfig> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("Failed to create HTTP client");

    Client::with_config(OpenAIConfig::default()).with_http_client(http_client)
}
