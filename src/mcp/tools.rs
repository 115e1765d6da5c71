//! Tool registry for MCP tools.
//!
//! One tool per route; the argument schema is generated from the route's
//! parameter declarations so it cannot drift from what the normalizer accepts.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{json, Map, Value};
use tokio_util::sync::CancellationToken;

use crate::error::AdapterError;
use crate::routing::{ParamDefault, ParamKind, ParamSpec, Route, ROUTES};
use crate::service::HealthService;

/// An MCP tool that can be called by the client
#[derive(Clone)]
pub struct Tool {
    /// Tool name (e.g., "fetch_health_summary")
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// JSON Schema for input parameters
    pub input_schema: Value,

    /// Handler function to execute the tool
    pub handler: Arc<dyn ToolHandler>,
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .finish()
    }
}

/// Handler for executing a tool
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync + std::fmt::Debug {
    /// Execute the tool with the given arguments
    async fn execute(&self, args: Value, cancel: CancellationToken) -> Result<Value, AdapterError>;
}

/// Forwards a tool call through the health pipeline
#[derive(Debug)]
pub struct RouteToolHandler {
    pub tool: &'static str,
    pub service: HealthService,
}

#[async_trait::async_trait]
impl ToolHandler for RouteToolHandler {
    async fn execute(&self, args: Value, cancel: CancellationToken) -> Result<Value, AdapterError> {
        let result = self.service.call_tool(self.tool, &args, &cancel).await?;
        Ok(result.to_value())
    }
}

/// Registry for all MCP tools
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Tool>,
}

impl ToolRegistry {
    /// Register one tool per route
    pub fn from_service(service: &HealthService) -> Self {
        let mut registry = Self {
            tools: BTreeMap::new(),
        };

        for route in ROUTES {
            registry.register(Tool {
                name: route.tool.to_string(),
                description: tool_description(route),
                input_schema: input_schema(route),
                handler: Arc::new(RouteToolHandler {
                    tool: route.tool,
                    service: service.clone(),
                }),
            });
        }

        registry
    }

    /// Register a tool
    pub fn register(&mut self, tool: Tool) {
        self.tools.insert(tool.name.clone(), tool);
    }

    /// Get all tools, ordered by name
    pub fn all(&self) -> Vec<&Tool> {
        self.tools.values().collect()
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    /// Execute a tool by name
    pub async fn execute(
        &self,
        name: &str,
        args: Value,
        cancel: CancellationToken,
    ) -> Result<Value, AdapterError> {
        let tool = self
            .get(name)
            .ok_or_else(|| AdapterError::UnknownTool(name.to_string()))?;

        tool.handler.execute(args, cancel).await
    }
}

fn tool_description(route: &Route) -> String {
    format!(
        "Fetch {} (same data as the {} resource)",
        route.description.to_lowercase(),
        route.uri_template()
    )
}

fn param_schema(spec: &ParamSpec) -> Value {
    let mut schema = match spec.kind {
        ParamKind::Enum(values) => json!({"type": "string", "enum": values}),
        ParamKind::PositiveInt => json!({"type": "integer", "minimum": 1}),
        ParamKind::NonNegativeInt => json!({"type": "integer", "minimum": 0}),
        ParamKind::NameList => json!({"type": "string"}),
        ParamKind::IdList => json!({
            "type": ["string", "array"],
            "items": {"type": "integer"}
        }),
    };

    schema["description"] = Value::String(spec.description.to_string());
    match spec.default {
        Some(ParamDefault::Int(n)) => schema["default"] = json!(n),
        Some(ParamDefault::Str(s)) => schema["default"] = json!(s),
        None => {}
    }
    schema
}

/// JSON Schema describing a route's arguments
pub fn input_schema(route: &Route) -> Value {
    let properties: Map<String, Value> = route
        .params
        .iter()
        .map(|spec| (spec.name.to_string(), param_schema(spec)))
        .collect();
    let required: Vec<&str> = route
        .params
        .iter()
        .filter(|spec| spec.required)
        .map(|spec| spec.name)
        .collect();

    json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UpstreamResult;
    use crate::routing::route_for_tool;
    use crate::upstream::MockUpstream;

    fn registry(mock: Arc<MockUpstream>) -> ToolRegistry {
        ToolRegistry::from_service(&HealthService::new(mock))
    }

    #[test]
    fn test_registry_has_a_tool_per_route() {
        let registry = registry(Arc::new(MockUpstream::new()));
        let names: Vec<&str> = registry.all().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "fetch_available_metrics",
                "fetch_current_health",
                "fetch_health_profile",
                "fetch_health_stats",
                "fetch_health_summary",
                "fetch_health_trends",
            ]
        );
    }

    #[test]
    fn test_summary_schema() {
        let schema = input_schema(route_for_tool("fetch_health_summary").unwrap());
        assert_eq!(schema["required"], json!(["period"]));
        assert_eq!(
            schema["properties"]["period"]["enum"],
            json!(["day", "week", "month", "year"])
        );
        assert_eq!(schema["properties"]["span"]["default"], json!(1));
        assert_eq!(schema["properties"]["metrics"]["default"], json!("all"));
        assert_eq!(schema["properties"]["offset"]["minimum"], json!(0));
    }

    #[test]
    fn test_profile_schema_is_empty() {
        let schema = input_schema(route_for_tool("fetch_health_profile").unwrap());
        assert_eq!(schema["properties"], json!({}));
        assert_eq!(schema["required"], json!([]));
    }

    #[tokio::test]
    async fn test_execute_returns_text_as_string() {
        let mock = Arc::new(MockUpstream::new());
        mock.respond(
            "health/profile",
            Ok(UpstreamResult::text("# Profile\nAge: 42", "text/markdown")),
        );
        let registry = registry(mock);

        let value = registry
            .execute("fetch_health_profile", json!({}), CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(value, json!("# Profile\nAge: 42"));
    }

    #[tokio::test]
    async fn test_execute_unknown_tool() {
        let registry = registry(Arc::new(MockUpstream::new()));
        let err = registry
            .execute("fetch_weather", json!({}), CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err, AdapterError::UnknownTool("fetch_weather".to_string()));
    }
}
