//! Typed, defaulted parameter records.
//!
//! A record is built once per call by the normalizer and never changed
//! afterwards. Converting it into an [`UpstreamRequest`] is deterministic:
//! query keys are always emitted in the same order.

use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;

use super::operation::{Interval, Operation, Period};
use super::request::UpstreamRequest;

/// Number of summary periods returned when `span` is omitted
pub const DEFAULT_SPAN: u32 = 1;

/// Number of periods skipped back from now when `offset` is omitted
pub const DEFAULT_OFFSET: u32 = 0;

/// Look-back window for trends and statistics when `days` is omitted
pub const DEFAULT_DAYS: u32 = 30;

/// Series bucket size when `interval` is omitted
pub const DEFAULT_INTERVAL: Interval = Interval::Day;

/// Which metrics a summary should include
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricSelection {
    /// Every metric the upstream knows about
    All,
    /// Explicit metric or group identifiers, in the order given, without duplicates
    Only(Vec<String>),
}

impl MetricSelection {
    /// Value sent as the `metrics` query parameter
    pub fn query_value(&self) -> String {
        match self {
            MetricSelection::All => "all".to_string(),
            MetricSelection::Only(names) => names.join(","),
        }
    }
}

impl Default for MetricSelection {
    fn default() -> Self {
        MetricSelection::All
    }
}

impl Serialize for MetricSelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MetricSelection::All => serializer.serialize_str("all"),
            MetricSelection::Only(names) => {
                let mut seq = serializer.serialize_seq(Some(names.len()))?;
                for name in names {
                    seq.serialize_element(name)?;
                }
                seq.end()
            }
        }
    }
}

/// Parameters for `health/summary/{period}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryParams {
    pub period: Period,
    /// Number of periods to return, always positive
    pub span: u32,
    pub metrics: MetricSelection,
    /// Number of periods to step back from the current one
    pub offset: u32,
}

/// Parameters for `health/current`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CurrentParams {
    /// Measurement type identifiers; `None` means every type
    pub types: Option<Vec<u32>>,
}

/// Parameters shared by `health/trends` and `health/stats`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesParams {
    /// Look-back window in days, always positive
    pub days: u32,
    pub interval: Interval,
    pub types: Option<Vec<u32>>,
}

impl Default for SeriesParams {
    fn default() -> Self {
        Self {
            days: DEFAULT_DAYS,
            interval: DEFAULT_INTERVAL,
            types: None,
        }
    }
}

/// A fully resolved parameter set for one operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "operation", content = "parameters", rename_all = "snake_case")]
pub enum ParameterRecord {
    Summary(SummaryParams),
    Profile,
    Current(CurrentParams),
    Trends(SeriesParams),
    Stats(SeriesParams),
    AvailableMetrics,
}

impl ParameterRecord {
    /// The operation this record belongs to
    pub fn operation(&self) -> Operation {
        match self {
            ParameterRecord::Summary(_) => Operation::Summary,
            ParameterRecord::Profile => Operation::Profile,
            ParameterRecord::Current(_) => Operation::Current,
            ParameterRecord::Trends(_) => Operation::Trends,
            ParameterRecord::Stats(_) => Operation::Stats,
            ParameterRecord::AvailableMetrics => Operation::AvailableMetrics,
        }
    }

    /// Build the upstream call for this record
    pub fn to_request(&self) -> UpstreamRequest {
        let operation = self.operation();
        match self {
            ParameterRecord::Summary(p) => UpstreamRequest::get(
                operation,
                format!("health/summary/{}", p.period),
                vec![
                    ("metrics".to_string(), p.metrics.query_value()),
                    ("span".to_string(), p.span.to_string()),
                    ("offset".to_string(), p.offset.to_string()),
                ],
            ),
            ParameterRecord::Profile => {
                UpstreamRequest::get(operation, "health/profile".to_string(), Vec::new())
            }
            ParameterRecord::AvailableMetrics => {
                UpstreamRequest::get(operation, "health/availablemetrics".to_string(), Vec::new())
            }
            ParameterRecord::Current(p) => {
                let mut query = Vec::new();
                push_types(&mut query, p.types.as_deref());
                UpstreamRequest::get(operation, "health/current".to_string(), query)
            }
            ParameterRecord::Trends(p) => {
                UpstreamRequest::get(operation, "health/trends".to_string(), series_query(p))
            }
            ParameterRecord::Stats(p) => {
                UpstreamRequest::get(operation, "health/stats".to_string(), series_query(p))
            }
        }
    }
}

fn series_query(params: &SeriesParams) -> Vec<(String, String)> {
    let mut query = vec![
        ("days".to_string(), params.days.to_string()),
        ("interval".to_string(), params.interval.to_string()),
    ];
    push_types(&mut query, params.types.as_deref());
    query
}

fn push_types(query: &mut Vec<(String, String)>, types: Option<&[u32]>) {
    if let Some(types) = types {
        let joined = types
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(",");
        query.push(("types".to_string(), joined));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_request_carries_all_defaults() {
        let record = ParameterRecord::Summary(SummaryParams {
            period: Period::Week,
            span: DEFAULT_SPAN,
            metrics: MetricSelection::All,
            offset: DEFAULT_OFFSET,
        });

        let request = record.to_request();
        assert_eq!(request.path, "health/summary/week");
        assert_eq!(request.query_string(), "metrics=all&span=1&offset=0");
    }

    #[test]
    fn test_series_request_omits_unset_types() {
        let request = ParameterRecord::Stats(SeriesParams::default()).to_request();
        assert_eq!(request.path, "health/stats");
        assert_eq!(request.query_string(), "days=30&interval=day");

        let request = ParameterRecord::Trends(SeriesParams {
            types: Some(vec![3, 12]),
            ..SeriesParams::default()
        })
        .to_request();
        assert_eq!(request.query_string(), "days=30&interval=day&types=3%2C12");
    }

    #[test]
    fn test_profile_has_no_query() {
        let request = ParameterRecord::Profile.to_request();
        assert_eq!(request.operation, Operation::Profile);
        assert!(request.query.is_empty());
    }

    #[test]
    fn test_metric_selection_serialization() {
        assert_eq!(serde_json::to_value(MetricSelection::All).unwrap(), "all");
        assert_eq!(
            serde_json::to_value(MetricSelection::Only(vec!["steps".into(), "sleep".into()]))
                .unwrap(),
            serde_json::json!(["steps", "sleep"])
        );
    }
}
