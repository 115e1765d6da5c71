//! HTTP client utilities.

use reqwest::Client;
use std::sync::Arc;

use crate::config::UpstreamConfig;

/// Shared HTTP client with timeouts taken from configuration
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Arc<Client>,
}

impl HttpClient {
    /// Create a client using the configured user agent and timeouts
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Get the underlying client
    pub fn client(&self) -> &Client {
        &self.client
    }
}
