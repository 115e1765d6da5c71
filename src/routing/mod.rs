//! Request resolution shared by the resource and tool surfaces.
//!
//! Both surfaces funnel into the same two steps:
//!
//! 1. [`routes`] maps a resource URI or a tool name to an [`Operation`] via
//!    the single [`ROUTES`] table, capturing path parameters for resources.
//! 2. [`params::normalize`] merges path and query/argument values with the
//!    operation's defaults into a [`ParameterRecord`].
//!
//! The record then yields the [`UpstreamRequest`]. Nothing here touches the
//! network, so a resolution can be inspected without calling the upstream.
//!
//! ```rust
//! use senechal_mcp::routing::{resolve_resource, resolve_tool};
//! use serde_json::json;
//!
//! let by_uri = resolve_resource("senechal://health/trends?days=90&interval=week").unwrap();
//! let by_tool = resolve_tool("fetch_health_trends", &json!({"days": 90, "interval": "week"})).unwrap();
//! assert_eq!(by_uri.request, by_tool.request);
//! ```

pub mod params;
pub mod routes;

pub use params::{normalize, RawParams};
pub use routes::{
    match_resource, route_for, route_for_tool, ParamDefault, ParamKind, ParamSpec, ResourceMatch,
    Route, RESOURCE_SCHEME, ROUTES,
};

use serde::Serialize;
use serde_json::Value;

use crate::error::AdapterError;
use crate::models::{Operation, ParameterRecord, UpstreamRequest};

/// Outcome of resolving a call on either surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolved {
    pub operation: Operation,
    pub params: ParameterRecord,
    pub request: UpstreamRequest,
}

impl Resolved {
    fn from_record(params: ParameterRecord) -> Self {
        Self {
            operation: params.operation(),
            request: params.to_request(),
            params,
        }
    }
}

/// Resolve a `senechal://` resource URI
pub fn resolve_resource(uri: &str) -> Result<Resolved, AdapterError> {
    let matched = match_resource(uri)?;
    let raw = matched.query.merge_path(&matched.path_params);
    let record = normalize(matched.route.operation, &raw)?;
    Ok(Resolved::from_record(record))
}

/// Resolve a tool call from its name and argument object
pub fn resolve_tool(name: &str, args: &Value) -> Result<Resolved, AdapterError> {
    let route = route_for_tool(name)?;
    let raw = RawParams::from_arguments(route.operation, args)?;
    let record = normalize(route.operation, &raw)?;
    Ok(Resolved::from_record(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Interval, MetricSelection, Period, SeriesParams, SummaryParams};
    use serde_json::json;

    #[test]
    fn test_summary_resource_scenario() {
        let resolved = resolve_resource("senechal://health/summary/day?span=7&metrics=all").unwrap();
        assert_eq!(resolved.operation, Operation::Summary);
        assert_eq!(
            resolved.params,
            ParameterRecord::Summary(SummaryParams {
                period: Period::Day,
                span: 7,
                metrics: MetricSelection::All,
                offset: 0,
            })
        );
    }

    #[test]
    fn test_trends_tool_matches_resource() {
        let by_tool =
            resolve_tool("fetch_health_trends", &json!({"days": 90, "interval": "week"})).unwrap();
        assert_eq!(
            by_tool.params,
            ParameterRecord::Trends(SeriesParams {
                days: 90,
                interval: Interval::Week,
                types: None,
            })
        );

        let by_uri = resolve_resource("senechal://health/trends?days=90&interval=week").unwrap();
        assert_eq!(by_tool, by_uri);
    }

    #[test]
    fn test_profile_tool_without_arguments() {
        let resolved = resolve_tool("fetch_health_profile", &json!({})).unwrap();
        assert_eq!(resolved.request.path, "health/profile");
        assert!(resolved.request.query.is_empty());
        assert_eq!(resolved.request.query_string(), "");
    }

    #[test]
    fn test_surfaces_agree_for_every_operation() {
        let cases = [
            (
                "senechal://health/summary/month?span=3&metrics=steps,sleep&offset=1",
                "fetch_health_summary",
                json!({"period": "month", "span": 3, "metrics": "steps,sleep", "offset": 1}),
            ),
            (
                "senechal://health/profile",
                "fetch_health_profile",
                json!({}),
            ),
            (
                "senechal://health/current?types=4,5",
                "fetch_current_health",
                json!({"types": [4, 5]}),
            ),
            (
                "senechal://health/trends",
                "fetch_health_trends",
                json!({}),
            ),
            (
                "senechal://health/stats?days=7&interval=month&types=1",
                "fetch_health_stats",
                json!({"days": "7", "interval": "month", "types": "1"}),
            ),
            (
                "senechal://health/availablemetrics",
                "fetch_available_metrics",
                json!(null),
            ),
        ];

        for (uri, tool, args) in cases {
            let by_uri = resolve_resource(uri).unwrap();
            let by_tool = resolve_tool(tool, &args).unwrap();
            assert_eq!(by_uri.request, by_tool.request, "{} vs {}", uri, tool);
        }
    }

    #[test]
    fn test_undeclared_tool_arguments_are_ignored() {
        let by_tool = resolve_tool(
            "fetch_health_summary",
            &json!({"period": "day", "context": {"session": "abc"}}),
        )
        .unwrap();
        let by_uri = resolve_resource("senechal://health/summary/day?context=x").unwrap();
        assert_eq!(by_tool, by_uri);

        let profile = resolve_tool("fetch_health_profile", &json!({"_meta": [[1]]})).unwrap();
        assert_eq!(profile.params, ParameterRecord::Profile);
    }

    #[test]
    fn test_errors_surface_before_any_call() {
        assert!(matches!(
            resolve_resource("senechal://health/summary/hour"),
            Err(AdapterError::InvalidParameter { .. })
        ));
        assert!(matches!(
            resolve_tool("fetch_health_summary", &json!({})),
            Err(AdapterError::MissingParameter(_))
        ));
        assert!(matches!(
            resolve_tool("fetch_weather", &json!({})),
            Err(AdapterError::UnknownTool(_))
        ));
    }
}
