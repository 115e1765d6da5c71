//! The route table: one row per operation, consulted by both surfaces.

use std::collections::BTreeMap;

use url::Url;

use crate::error::AdapterError;
use crate::models::{Interval, Operation, Period, DEFAULT_DAYS, DEFAULT_OFFSET, DEFAULT_SPAN};

use super::params::RawParams;

/// URI scheme of every resource
pub const RESOURCE_SCHEME: &str = "senechal";

/// Kind of value a parameter accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// One of a fixed set of names
    Enum(&'static [&'static str]),
    /// Integer greater than zero
    PositiveInt,
    /// Integer greater than or equal to zero
    NonNegativeInt,
    /// Comma-separated names, `all` for everything
    NameList,
    /// Comma-separated integer identifiers
    IdList,
}

/// Declared parameter of an operation
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    pub default: Option<ParamDefault>,
    pub description: &'static str,
}

/// Default value, typed so it can be rendered into a JSON schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamDefault {
    Int(u32),
    Str(&'static str),
}

/// One operation's addressing on both surfaces
#[derive(Debug, Clone, Copy)]
pub struct Route {
    pub operation: Operation,
    /// Tool surface name
    pub tool: &'static str,
    /// Resource template, relative to `senechal://`
    pub template: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// MIME type advertised before the upstream has answered
    pub mime_type: &'static str,
    pub params: &'static [ParamSpec],
}

impl Route {
    /// Full resource URI template
    pub fn uri_template(&self) -> String {
        format!("{}://{}", RESOURCE_SCHEME, self.template)
    }

    /// Whether the template captures path parameters
    pub fn is_templated(&self) -> bool {
        self.template.contains('{')
    }

    /// Match a resource path (no scheme, no query) against this template
    fn capture(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let expected: Vec<&str> = self.template.split('/').collect();
        let actual: Vec<&str> = path.split('/').collect();
        if expected.len() != actual.len() {
            return None;
        }

        let mut captured = BTreeMap::new();
        for (pattern, segment) in expected.iter().zip(actual.iter()) {
            if let Some(name) = pattern
                .strip_prefix('{')
                .and_then(|rest| rest.strip_suffix('}'))
            {
                if segment.is_empty() {
                    return None;
                }
                captured.insert(name.to_string(), segment.to_string());
            } else if pattern != segment {
                return None;
            }
        }
        Some(captured)
    }
}

const TYPES_PARAM: ParamSpec = ParamSpec {
    name: "types",
    kind: ParamKind::IdList,
    required: false,
    default: None,
    description: "Comma-separated measurement type IDs; omit for all types",
};

const SERIES_PARAMS: &[ParamSpec] = &[
    ParamSpec {
        name: "days",
        kind: ParamKind::PositiveInt,
        required: false,
        default: Some(ParamDefault::Int(DEFAULT_DAYS)),
        description: "Number of days to look back",
    },
    ParamSpec {
        name: "interval",
        kind: ParamKind::Enum(&Interval::VALUES),
        required: false,
        default: Some(ParamDefault::Str("day")),
        description: "Bucket size for the series (day, week, month)",
    },
    TYPES_PARAM,
];

/// Every route the adapter serves
pub static ROUTES: &[Route] = &[
    Route {
        operation: Operation::Summary,
        tool: "fetch_health_summary",
        template: "health/summary/{period}",
        title: "Health summary",
        description: "Health summary for a period (day, week, month, year)",
        mime_type: "application/json",
        params: &[
            ParamSpec {
                name: "period",
                kind: ParamKind::Enum(&Period::VALUES),
                required: true,
                default: None,
                description: "The period type (day, week, month, year)",
            },
            ParamSpec {
                name: "metrics",
                kind: ParamKind::NameList,
                required: false,
                default: Some(ParamDefault::Str("all")),
                description: "Comma-separated metrics/groups or 'all'",
            },
            ParamSpec {
                name: "span",
                kind: ParamKind::PositiveInt,
                required: false,
                default: Some(ParamDefault::Int(DEFAULT_SPAN)),
                description: "Number of periods to return",
            },
            ParamSpec {
                name: "offset",
                kind: ParamKind::NonNegativeInt,
                required: false,
                default: Some(ParamDefault::Int(DEFAULT_OFFSET)),
                description: "Number of periods to offset from now",
            },
        ],
    },
    Route {
        operation: Operation::Profile,
        tool: "fetch_health_profile",
        template: "health/profile",
        title: "Health profile",
        description: "The user's health profile",
        mime_type: "application/json",
        params: &[],
    },
    Route {
        operation: Operation::Current,
        tool: "fetch_current_health",
        template: "health/current",
        title: "Current health",
        description: "Most recent measurement for each health metric",
        mime_type: "application/json",
        params: &[TYPES_PARAM],
    },
    Route {
        operation: Operation::Trends,
        tool: "fetch_health_trends",
        template: "health/trends",
        title: "Health trends",
        description: "Health metric trends over a look-back window",
        mime_type: "application/json",
        params: SERIES_PARAMS,
    },
    Route {
        operation: Operation::Stats,
        tool: "fetch_health_stats",
        template: "health/stats",
        title: "Health statistics",
        description: "Statistics (min, max, average) for health metrics over a look-back window",
        mime_type: "application/json",
        params: SERIES_PARAMS,
    },
    Route {
        operation: Operation::AvailableMetrics,
        tool: "fetch_available_metrics",
        template: "health/availablemetrics",
        title: "Available metrics",
        description: "Catalogue of available health metrics in markdown",
        mime_type: "text/markdown",
        params: &[],
    },
];

/// Route serving `operation`
pub fn route_for(operation: Operation) -> &'static Route {
    let index = match operation {
        Operation::Summary => 0,
        Operation::Profile => 1,
        Operation::Current => 2,
        Operation::Trends => 3,
        Operation::Stats => 4,
        Operation::AvailableMetrics => 5,
    };
    &ROUTES[index]
}

/// Look up a route by tool name
pub fn route_for_tool(name: &str) -> Result<&'static Route, AdapterError> {
    ROUTES
        .iter()
        .find(|r| r.tool == name)
        .ok_or_else(|| AdapterError::UnknownTool(name.to_string()))
}

/// A resource URI matched against the route table
#[derive(Debug, Clone)]
pub struct ResourceMatch {
    pub route: &'static Route,
    /// Values captured from `{...}` template segments
    pub path_params: BTreeMap<String, String>,
    /// Decoded query string
    pub query: RawParams,
}

/// Match a `senechal://` URI against the route table
pub fn match_resource(uri: &str) -> Result<ResourceMatch, AdapterError> {
    let unknown = || AdapterError::UnknownResource(uri.to_string());

    let parsed = Url::parse(uri.trim()).map_err(|_| unknown())?;
    if parsed.scheme() != RESOURCE_SCHEME {
        return Err(unknown());
    }

    // For a non-special scheme the first path element lands in the host.
    let mut path = format!("{}{}", parsed.host_str().unwrap_or_default(), parsed.path());
    while path.ends_with('/') {
        path.pop();
    }

    for route in ROUTES {
        if let Some(path_params) = route.capture(&path) {
            return Ok(ResourceMatch {
                route,
                path_params,
                query: RawParams::from_query(&parsed),
            });
        }
    }
    Err(unknown())
}
