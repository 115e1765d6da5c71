//! Core data models for health-data operations and upstream calls.

mod operation;
mod params;
mod request;

pub use operation::{Interval, Operation, Period};
pub use params::{
    CurrentParams, MetricSelection, ParameterRecord, SeriesParams, SummaryParams, DEFAULT_DAYS,
    DEFAULT_INTERVAL, DEFAULT_OFFSET, DEFAULT_SPAN,
};
pub use request::{Payload, UpstreamRequest, UpstreamResult};
