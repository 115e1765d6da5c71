//! Configuration management.
//!
//! Settings are layered: an optional TOML file first, then `SENECHAL_*`
//! environment variables, which win over the file.
//!
//! ```toml
//! api_base_url = "https://senechal.example.com/api"
//! api_key = "your-api-key"
//! timeout_secs = 30
//! connect_timeout_secs = 10
//! ```
//!
//! The same keys are read from `SENECHAL_API_BASE_URL`, `SENECHAL_API_KEY`,
//! `SENECHAL_TIMEOUT_SECS` and `SENECHAL_CONNECT_TIMEOUT_SECS`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// File name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "senechal-mcp.toml";

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("{0} is required (set it in the config file or the environment)")]
    Missing(&'static str),

    #[error("Invalid API base URL '{0}': expected an absolute http(s) URL")]
    InvalidBaseUrl(String),
}

/// Raw application configuration, as read from file and environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the Senechal API
    #[serde(default)]
    pub api_base_url: Option<String>,

    /// Credential sent with every upstream request
    #[serde(default)]
    pub api_key: Option<String>,

    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// User agent for upstream requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: None,
            api_key: None,
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Validated, immutable settings for the upstream gateway
#[derive(Clone)]
pub struct UpstreamConfig {
    pub base_url: Url,
    pub api_key: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &mask(&self.api_key))
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl UpstreamConfig {
    /// Build directly from a base URL and credential with default timeouts
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self, ConfigError> {
        Config {
            api_base_url: Some(base_url.to_string()),
            api_key: Some(api_key.into()),
            ..Config::default()
        }
        .validate()
    }
}

impl Config {
    /// Check that both required values are present and usable
    pub fn validate(&self) -> Result<UpstreamConfig, ConfigError> {
        let base_url = self
            .api_base_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("SENECHAL_API_BASE_URL"))?;
        let api_key = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("SENECHAL_API_KEY"))?;

        let parsed =
            Url::parse(base_url).map_err(|_| ConfigError::InvalidBaseUrl(base_url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
            return Err(ConfigError::InvalidBaseUrl(base_url.to_string()));
        }

        Ok(UpstreamConfig {
            base_url: parsed,
            api_key: api_key.to_string(),
            timeout: Duration::from_secs(self.timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            user_agent: self.user_agent.clone(),
        })
    }

    /// Render as TOML with the credential masked
    pub fn to_masked_toml(&self) -> Result<String, toml::ser::Error> {
        let mut shown = self.clone();
        shown.api_key = shown.api_key.as_deref().map(mask);
        toml::to_string_pretty(&shown)
    }
}

/// Replace every character of a secret with `*`
pub fn mask(secret: &str) -> String {
    "*".repeat(secret.chars().count())
}

/// Find a configuration file in the default locations
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    let user = dirs::config_dir()?.join("senechal-mcp").join("config.toml");
    user.is_file().then_some(user)
}

/// Load configuration from an optional file plus the environment
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();
    match path {
        Some(path) => builder = builder.add_source(config::File::from(path)),
        None => {
            if let Some(found) = find_config_file() {
                tracing::info!("Using config file: {}", found.display());
                builder = builder.add_source(config::File::from(found.as_path()));
            }
        }
    }

    let settings = builder
        .add_source(config::Environment::with_prefix("SENECHAL"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
