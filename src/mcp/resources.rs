//! MCP resource surface.
//!
//! Resources are addressed as `senechal://health/...` URIs. Reads go through
//! the same pipeline as tool calls; the query string supplies what tool
//! arguments would.

use async_trait::async_trait;
use pmcp::types::{Content, ListResourcesResult, ReadResourceResult, ResourceInfo};
use pmcp::{RequestHandlerExtra, ResourceHandler};

use crate::models::{Payload, Period, UpstreamResult};
use crate::routing::ROUTES;
use crate::service::HealthService;

/// MIME type declared for JSON payloads
pub const JSON_MIME: &str = "application/json";

/// A concrete resource advertised by `resources/list`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEntry {
    pub uri: String,
    pub name: String,
    pub description: String,
    pub mime_type: &'static str,
}

/// Concrete resources: templated routes are expanded over their enum values
pub fn resource_entries() -> Vec<ResourceEntry> {
    let mut entries = Vec::new();
    for route in ROUTES {
        let mime_type = route.mime_type;
        if route.is_templated() {
            for period in Period::VALUES {
                entries.push(ResourceEntry {
                    uri: route.uri_template().replace("{period}", period),
                    name: format!("{} ({})", route.title, period),
                    description: format!(
                        "{}. Query parameters: metrics, span, offset",
                        route.description
                    ),
                    mime_type,
                });
            }
        } else {
            let params: Vec<&str> = route.params.iter().map(|p| p.name).collect();
            let description = if params.is_empty() {
                route.description.to_string()
            } else {
                format!(
                    "{}. Query parameters: {}",
                    route.description,
                    params.join(", ")
                )
            };
            entries.push(ResourceEntry {
                uri: route.uri_template(),
                name: route.title.to_string(),
                description,
                mime_type,
            });
        }
    }
    entries
}

/// Resource contents for an upstream result.
///
/// JSON payloads are declared as `application/json`; text keeps the
/// upstream's content type.
pub fn resource_content(uri: &str, result: &UpstreamResult) -> Content {
    let mime_type = match &result.payload {
        Payload::Json(_) => JSON_MIME.to_string(),
        Payload::Text(_) => result.content_type.clone(),
    };
    Content::Resource {
        uri: uri.to_string(),
        text: Some(result.to_text()),
        mime_type: Some(mime_type),
    }
}

/// Serves `resources/list` and `resources/read`
#[derive(Debug, Clone)]
pub struct ResourceAdapter {
    service: HealthService,
}

impl ResourceAdapter {
    pub fn new(service: HealthService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ResourceHandler for ResourceAdapter {
    async fn read(
        &self,
        uri: &str,
        extra: RequestHandlerExtra,
    ) -> Result<ReadResourceResult, pmcp::Error> {
        let result = self
            .service
            .read_resource(uri, &extra.cancellation_token)
            .await?;

        Ok(ReadResourceResult {
            contents: vec![resource_content(uri, &result)],
        })
    }

    async fn list(
        &self,
        _cursor: Option<String>,
        _extra: RequestHandlerExtra,
    ) -> Result<ListResourcesResult, pmcp::Error> {
        let resources = resource_entries()
            .into_iter()
            .map(|entry| ResourceInfo {
                uri: entry.uri,
                name: entry.name,
                description: Some(entry.description),
                mime_type: Some(entry.mime_type.to_string()),
            })
            .collect();

        Ok(ListResourcesResult {
            resources,
            next_cursor: None,
        })
    }
}
