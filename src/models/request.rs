//! Upstream request and result models.

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use super::operation::Operation;

/// A resolved upstream call: method, path relative to the API base, and query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpstreamRequest {
    pub operation: Operation,
    /// Path relative to the configured base URL, without a leading slash
    pub path: String,
    /// Query pairs in emission order
    pub query: Vec<(String, String)>,
}

impl UpstreamRequest {
    pub(crate) fn get(operation: Operation, path: String, query: Vec<(String, String)>) -> Self {
        Self {
            operation,
            path,
            query,
        }
    }

    /// The upstream API is read-only
    pub fn method(&self) -> Method {
        Method::GET
    }

    /// Form-encoded query string, empty when there are no parameters
    pub fn query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.query)
            .finish()
    }

    /// Absolute URL under `base`, keeping any path prefix the base carries
    pub fn url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(self.path.split('/'));
        }
        url.set_query(None);
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        url
    }
}

/// Body returned by the upstream
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Decoded JSON document
    Json(Value),
    /// Text passed through verbatim (markdown profile, metric catalogue)
    Text(String),
}

/// An upstream response, handed back to the caller unmodified
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResult {
    pub payload: Payload,
    /// Content type reported by the upstream, without parameters
    pub content_type: String,
}

impl UpstreamResult {
    pub fn json(value: Value) -> Self {
        Self {
            payload: Payload::Json(value),
            content_type: "application/json".to_string(),
        }
    }

    pub fn text(text: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            payload: Payload::Text(text.into()),
            content_type: content_type.into(),
        }
    }

    /// Payload rendered as text, pretty-printing JSON
    pub fn to_text(&self) -> String {
        match &self.payload {
            Payload::Json(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            Payload::Text(text) => text.clone(),
        }
    }

    /// Payload as a JSON value; text becomes a JSON string
    pub fn to_value(&self) -> Value {
        match &self.payload {
            Payload::Json(value) => value.clone(),
            Payload::Text(text) => Value::String(text.clone()),
        }
    }
}
