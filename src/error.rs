//! Error taxonomy shared by every surface.
//!
//! Routing and normalization failures are raised before any network call;
//! upstream failures carry the real status and body back to the caller.

use thiserror::Error;

/// Errors that can occur while resolving or executing a request
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// No resource template matches the URI
    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    /// No tool is registered under this name
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A required parameter was absent or empty
    #[error("Missing required parameter '{0}'")]
    MissingParameter(String),

    /// A parameter was supplied but could not be accepted
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The upstream API could not be reached
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The upstream answered with a non-success status or an undecodable body
    #[error("Upstream error (HTTP {status}): {body}")]
    UpstreamError { status: u16, body: String },

    /// The caller cancelled the request while it was in flight
    #[error("Request cancelled")]
    Cancelled,
}

impl AdapterError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        AdapterError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the error was caused by caller-supplied data.
    ///
    /// These are detected before the upstream is contacted.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AdapterError::UnknownResource(_)
                | AdapterError::UnknownTool(_)
                | AdapterError::MissingParameter(_)
                | AdapterError::InvalidParameter { .. }
        )
    }

    /// HTTP status reported by the upstream, if any
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            AdapterError::UpstreamError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            AdapterError::UpstreamError {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else if err.is_decode() {
            AdapterError::UpstreamError {
                status: 200,
                body: format!("failed to decode response: {}", err),
            }
        } else {
            AdapterError::UpstreamUnavailable(err.to_string())
        }
    }
}

impl From<AdapterError> for pmcp::Error {
    fn from(err: AdapterError) -> Self {
        if err.is_client_error() {
            pmcp::Error::invalid_params(err.to_string())
        } else {
            pmcp::Error::internal(err.to_string())
        }
    }
}
