//! Resolve, normalize, fetch.
//!
//! [`HealthService`] is the pipeline every surface adapter calls. It holds
//! no mutable state; each call resolves a fresh parameter record and
//! performs at most one upstream request.

use std::sync::Arc;

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::AdapterError;
use crate::models::UpstreamResult;
use crate::routing::{self, Resolved};
use crate::upstream::Upstream;

/// Request pipeline shared by the resource and tool surfaces
#[derive(Debug, Clone)]
pub struct HealthService {
    upstream: Arc<dyn Upstream>,
}

impl HealthService {
    pub fn new(upstream: Arc<dyn Upstream>) -> Self {
        Self { upstream }
    }

    /// Read a `senechal://` resource
    pub async fn read_resource(
        &self,
        uri: &str,
        cancel: &CancellationToken,
    ) -> Result<UpstreamResult, AdapterError> {
        tracing::info!("Resource request: {}", uri);
        let resolved = routing::resolve_resource(uri).map_err(|e| {
            tracing::warn!("Rejected resource request {}: {}", uri, e);
            e
        })?;
        self.execute(&resolved, cancel).await
    }

    /// Invoke a tool by name
    pub async fn call_tool(
        &self,
        name: &str,
        args: &Value,
        cancel: &CancellationToken,
    ) -> Result<UpstreamResult, AdapterError> {
        tracing::info!("Tool call: {} - Args: {}", name, args);
        let resolved = routing::resolve_tool(name, args).map_err(|e| {
            tracing::warn!("Rejected tool call {}: {}", name, e);
            e
        })?;
        self.execute(&resolved, cancel).await
    }

    /// Perform the upstream call for an already resolved request
    pub async fn execute(
        &self,
        resolved: &Resolved,
        cancel: &CancellationToken,
    ) -> Result<UpstreamResult, AdapterError> {
        if cancel.is_cancelled() {
            return Err(AdapterError::Cancelled);
        }

        tokio::select! {
            () = cancel.cancelled() => {
                tracing::info!("Request cancelled: {}", resolved.operation);
                Err(AdapterError::Cancelled)
            }
            result = self.upstream.fetch(&resolved.request) => {
                if let Err(e) = &result {
                    tracing::error!("{} request failed via {}: {}", resolved.operation, self.upstream.name(), e);
                }
                result
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Operation;
    use crate::upstream::MockUpstream;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn test_rejected_calls_never_reach_upstream() {
        let mock = Arc::new(MockUpstream::new());
        let service = HealthService::new(mock.clone());
        let cancel = CancellationToken::new();

        let err = service
            .read_resource("senechal://health/summary/hour", &cancel)
            .await
            .unwrap_err();
        assert!(err.is_client_error());

        let err = service
            .call_tool("fetch_health_stats", &json!({"days": 0}), &cancel)
            .await
            .unwrap_err();
        assert!(err.is_client_error());

        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_result_is_passed_through() {
        let mock = Arc::new(MockUpstream::new());
        mock.respond(
            "health/current",
            Ok(UpstreamResult::json(json!({"measurements": [{"type": 1}]}))),
        );
        let service = HealthService::new(mock.clone());

        let result = service
            .call_tool("fetch_current_health", &json!({}), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(result.to_value(), json!({"measurements": [{"type": 1}]}));
        assert_eq!(mock.requests()[0].operation, Operation::Current);
    }

    #[tokio::test]
    async fn test_cancellation_aborts_in_flight_call() {
        let mock = Arc::new(MockUpstream::new().with_delay(Duration::from_secs(30)));
        let service = HealthService::new(mock.clone());
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let err = service
            .read_resource("senechal://health/trends", &cancel)
            .await
            .unwrap_err();
        assert_eq!(err, AdapterError::Cancelled);
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_already_cancelled_skips_upstream() {
        let mock = Arc::new(MockUpstream::new());
        let service = HealthService::new(mock.clone());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = service
            .read_resource("senechal://health/profile", &cancel)
            .await
            .unwrap_err();
        assert_eq!(err, AdapterError::Cancelled);
        assert!(mock.requests().is_empty());
    }
}
