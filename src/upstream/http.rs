//! Senechal API gateway over HTTP.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::config::UpstreamConfig;
use crate::error::AdapterError;
use crate::models::{UpstreamRequest, UpstreamResult};
use crate::utils::HttpClient;

use super::Upstream;

/// Header carrying the configured credential
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Gateway to the Senechal health API
#[derive(Clone)]
pub struct HttpUpstream {
    http: HttpClient,
    base_url: Url,
    api_key: String,
}

impl std::fmt::Debug for HttpUpstream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpUpstream")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl HttpUpstream {
    /// Create a gateway from validated configuration
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(HttpClient::from_config(config)?, config))
    }

    /// Create a gateway sharing an existing HTTP client
    pub fn with_client(http: HttpClient, config: &UpstreamConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

/// Media type without parameters, lowercased
fn media_type(value: &str) -> String {
    value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Error for a non-success status; the status survives a failed body read
fn status_error(status: u16, body: Result<String, String>) -> AdapterError {
    let body = body.unwrap_or_else(|e| format!("failed to read response body: {}", e));
    AdapterError::UpstreamError { status, body }
}

fn is_json(media_type: &str) -> bool {
    media_type == "application/json" || media_type.ends_with("+json")
}

#[async_trait]
impl Upstream for HttpUpstream {
    fn name(&self) -> &str {
        "senechal"
    }

    async fn fetch(&self, request: &UpstreamRequest) -> Result<UpstreamResult, AdapterError> {
        let url = request.url(&self.base_url);
        tracing::info!("API request: {} /{}", request.operation, request.path);
        tracing::debug!("API query: {:?}", request.query);

        let response = self
            .http
            .client()
            .request(request.method(), url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("API request failed: /{} - {}", request.path, e);
                AdapterError::from(e)
            })?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(media_type)
            .unwrap_or_default();
        let body = response.text().await;

        if !status.is_success() {
            tracing::warn!("API request returned {}: /{}", status, request.path);
            return Err(status_error(status.as_u16(), body.map_err(|e| e.to_string())));
        }
        let body = body.map_err(AdapterError::from)?;

        tracing::info!("API request successful: /{}", request.path);

        if is_json(&content_type) {
            let value = serde_json::from_str(&body).map_err(|e| AdapterError::UpstreamError {
                status: status.as_u16(),
                body: format!("failed to decode JSON response: {}", e),
            })?;
            return Ok(UpstreamResult::json(value));
        }

        if content_type.is_empty() {
            // Untyped bodies are sniffed: JSON if it parses, plain text otherwise.
            return Ok(match serde_json::from_str(&body) {
                Ok(value) => UpstreamResult::json(value),
                Err(_) => UpstreamResult::text(body, "text/plain"),
            });
        }

        Ok(UpstreamResult::text(body, content_type))
    }
}
