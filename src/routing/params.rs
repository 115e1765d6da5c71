//! Parameter normalization.
//!
//! Raw values arrive as strings, either from a resource query string or
//! coerced from structured tool arguments. Both go through [`normalize`], so
//! the same inputs always give the same [`ParameterRecord`].

use std::collections::BTreeMap;

use serde_json::Value;
use url::Url;

use crate::error::AdapterError;
use crate::models::{
    CurrentParams, Interval, MetricSelection, Operation, ParameterRecord, Period, SeriesParams,
    SummaryParams, DEFAULT_DAYS, DEFAULT_INTERVAL, DEFAULT_OFFSET, DEFAULT_SPAN,
};

use super::routes::route_for;

/// Raw, untyped parameter values keyed by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawParams {
    values: BTreeMap<String, String>,
}

impl RawParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value, replacing any earlier one under the same name
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Decoded query pairs of a URI; a repeated key keeps its last value
    pub fn from_query(uri: &Url) -> Self {
        let values = uri
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { values }
    }

    /// Coerce a tool argument object into raw string values.
    ///
    /// Only names `operation` declares are coerced: scalars use their JSON
    /// text, arrays of scalars are joined with `,` and `null` counts as
    /// absent. Undeclared names are dropped whatever their shape.
    pub fn from_arguments(operation: Operation, args: &Value) -> Result<Self, AdapterError> {
        let map = match args {
            Value::Null => return Ok(Self::default()),
            Value::Object(map) => map,
            _ => {
                return Err(AdapterError::invalid(
                    "arguments",
                    "expected an object of named arguments",
                ))
            }
        };

        let declared = route_for(operation).params;
        let mut values = BTreeMap::new();
        for (name, value) in map {
            if !declared.iter().any(|p| p.name == name) {
                tracing::debug!("Ignoring argument '{}' for {}", name, operation);
                continue;
            }
            let raw = match value {
                Value::Null => continue,
                Value::Array(items) => items
                    .iter()
                    .map(|item| scalar_text(name, item))
                    .collect::<Result<Vec<_>, _>>()?
                    .join(","),
                other => scalar_text(name, other)?,
            };
            values.insert(name.clone(), raw);
        }
        Ok(Self { values })
    }

    /// Overlay path-captured values; they take precedence over query values
    pub fn merge_path(mut self, path_params: &BTreeMap<String, String>) -> Self {
        for (name, value) in path_params {
            self.values.insert(name.clone(), value.clone());
        }
        self
    }

    /// Trimmed value, or `None` when absent or blank
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn scalar_text(name: &str, value: &Value) -> Result<String, AdapterError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(AdapterError::invalid(
            name,
            "expected a string, number, boolean or list of those",
        )),
    }
}

/// Build the typed parameter record for `operation`.
///
/// Absent and empty values fall back to defaults. Names the operation does
/// not declare are ignored.
pub fn normalize(operation: Operation, raw: &RawParams) -> Result<ParameterRecord, AdapterError> {
    let declared = route_for(operation).params;
    for name in raw.names() {
        if !declared.iter().any(|p| p.name == name) {
            tracing::debug!("Ignoring parameter '{}' for {}", name, operation);
        }
    }

    let record = match operation {
        Operation::Summary => {
            let period = match raw.get("period") {
                Some(value) => parse_enum("period", value, Period::parse, &Period::VALUES)?,
                None => return Err(AdapterError::MissingParameter("period".to_string())),
            };
            ParameterRecord::Summary(SummaryParams {
                period,
                span: positive_int(raw, "span", DEFAULT_SPAN)?,
                metrics: metric_selection(raw),
                offset: non_negative_int(raw, "offset", DEFAULT_OFFSET)?,
            })
        }
        Operation::Profile => ParameterRecord::Profile,
        Operation::AvailableMetrics => ParameterRecord::AvailableMetrics,
        Operation::Current => ParameterRecord::Current(CurrentParams {
            types: id_list(raw, "types")?,
        }),
        Operation::Trends => ParameterRecord::Trends(series(raw)?),
        Operation::Stats => ParameterRecord::Stats(series(raw)?),
    };
    Ok(record)
}

fn series(raw: &RawParams) -> Result<SeriesParams, AdapterError> {
    let interval = match raw.get("interval") {
        Some(value) => parse_enum("interval", value, Interval::parse, &Interval::VALUES)?,
        None => DEFAULT_INTERVAL,
    };
    Ok(SeriesParams {
        days: positive_int(raw, "days", DEFAULT_DAYS)?,
        interval,
        types: id_list(raw, "types")?,
    })
}

fn parse_enum<T>(
    name: &str,
    value: &str,
    parse: fn(&str) -> Option<T>,
    allowed: &[&str],
) -> Result<T, AdapterError> {
    parse(value).ok_or_else(|| {
        AdapterError::invalid(
            name,
            format!("expected one of {} (got '{}')", allowed.join(", "), value),
        )
    })
}

fn parse_int(name: &str, value: &str) -> Result<i64, AdapterError> {
    value
        .parse::<i64>()
        .map_err(|_| AdapterError::invalid(name, format!("expected an integer (got '{}')", value)))
}

fn to_u32(name: &str, value: i64) -> Result<u32, AdapterError> {
    u32::try_from(value)
        .map_err(|_| AdapterError::invalid(name, format!("value {} is out of range", value)))
}

fn positive_int(raw: &RawParams, name: &str, default: u32) -> Result<u32, AdapterError> {
    let Some(value) = raw.get(name) else {
        return Ok(default);
    };
    let parsed = parse_int(name, value)?;
    if parsed <= 0 {
        return Err(AdapterError::invalid(
            name,
            format!("must be a positive integer (got {})", parsed),
        ));
    }
    to_u32(name, parsed)
}

fn non_negative_int(raw: &RawParams, name: &str, default: u32) -> Result<u32, AdapterError> {
    let Some(value) = raw.get(name) else {
        return Ok(default);
    };
    let parsed = parse_int(name, value)?;
    if parsed < 0 {
        return Err(AdapterError::invalid(
            name,
            format!("must not be negative (got {})", parsed),
        ));
    }
    to_u32(name, parsed)
}

/// Split on `,`, trim, drop blanks
fn split_list(value: &str) -> Vec<&str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}

fn metric_selection(raw: &RawParams) -> MetricSelection {
    let items = raw.get("metrics").map(split_list).unwrap_or_default();
    if items.is_empty() || items.iter().any(|m| m.eq_ignore_ascii_case("all")) {
        return MetricSelection::All;
    }

    let mut names: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if !names.iter().any(|n| n == item) {
            names.push(item.to_string());
        }
    }
    MetricSelection::Only(names)
}

fn id_list(raw: &RawParams, name: &str) -> Result<Option<Vec<u32>>, AdapterError> {
    let items = raw.get(name).map(split_list).unwrap_or_default();
    if items.is_empty() {
        return Ok(None);
    }

    let mut ids: Vec<u32> = Vec::with_capacity(items.len());
    for item in items {
        let id = item.parse::<u32>().map_err(|_| {
            AdapterError::invalid(
                name,
                format!("element '{}' is not an integer identifier", item),
            )
        })?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(Some(ids))
}
