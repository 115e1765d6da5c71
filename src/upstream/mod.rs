//! Upstream gateway.
//!
//! The [`Upstream`] trait is the single suspension point of a request: it
//! turns a resolved [`UpstreamRequest`] into an [`UpstreamResult`] or a
//! structured failure. [`HttpUpstream`] talks to the real API;
//! [`MockUpstream`] serves canned answers for tests.
//!
//! Implementations never retry. A failed call is reported once and the
//! caller decides what to do with it.

mod http;
pub mod mock;

pub use http::{HttpUpstream, API_KEY_HEADER};
pub use mock::MockUpstream;

use async_trait::async_trait;

use crate::error::AdapterError;
use crate::models::{UpstreamRequest, UpstreamResult};

/// A backend able to execute resolved health-data requests
#[async_trait]
pub trait Upstream: Send + Sync + std::fmt::Debug {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Execute one request.
    ///
    /// Dropping the returned future must abort any in-flight I/O.
    async fn fetch(&self, request: &UpstreamRequest) -> Result<UpstreamResult, AdapterError>;
}
