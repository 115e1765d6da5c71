//! Integration tests for Senechal MCP
//!
//! These tests drive the full pipeline (resolve, normalize, fetch) against a
//! local mock of the Senechal API.

use mockito::{Matcher, Server, ServerGuard};
use senechal_mcp::config::UpstreamConfig;
use senechal_mcp::mcp::{resource_entries, McpServer, ToolRegistry};
use senechal_mcp::models::Payload;
use senechal_mcp::upstream::API_KEY_HEADER;
use senechal_mcp::{AdapterError, HealthService, HttpUpstream, MockUpstream, Operation};
use serde_json::json;
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};
use tokio_util::sync::CancellationToken;

const API_KEY: &str = "test-key";

fn service_for(base_url: &str) -> HealthService {
    let config = UpstreamConfig::new(base_url, API_KEY).unwrap();
    let upstream = HttpUpstream::new(&config).unwrap();
    HealthService::new(Arc::new(upstream))
}

async fn mock_api() -> (ServerGuard, HealthService) {
    let server = Server::new_async().await;
    let service = service_for(&server.url());
    (server, service)
}

fn query(pairs: &[(&str, &str)]) -> Matcher {
    Matcher::AllOf(
        pairs
            .iter()
            .map(|(k, v)| Matcher::UrlEncoded(k.to_string(), v.to_string()))
            .collect(),
    )
}

#[tokio::test]
async fn test_summary_resource_reaches_upstream() {
    let (mut server, service) = mock_api().await;
    let mock = server
        .mock("GET", "/health/summary/day")
        .match_query(query(&[("metrics", "all"), ("span", "7"), ("offset", "0")]))
        .match_header(API_KEY_HEADER, API_KEY)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"period":"day","metrics":{"steps":[8000]}}"#)
        .create_async()
        .await;

    let result = service
        .read_resource(
            "senechal://health/summary/day?span=7&metrics=all",
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(
        result.payload,
        Payload::Json(json!({"period": "day", "metrics": {"steps": [8000]}}))
    );
}

#[tokio::test]
async fn test_trends_tool_reaches_upstream() {
    let (mut server, service) = mock_api().await;
    let mock = server
        .mock("GET", "/health/trends")
        .match_query(query(&[("days", "90"), ("interval", "week")]))
        .match_header(API_KEY_HEADER, API_KEY)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"trends":[]}"#)
        .create_async()
        .await;

    let result = service
        .call_tool(
            "fetch_health_trends",
            &json!({"days": 90, "interval": "week"}),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(result.to_value(), json!({"trends": []}));
}

#[tokio::test]
async fn test_profile_tool_sends_no_query() {
    let (mut server, service) = mock_api().await;
    let mock = server
        .mock("GET", "/health/profile")
        .match_query(Matcher::Missing)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"age":40}"#)
        .create_async()
        .await;

    service
        .call_tool("fetch_health_profile", &json!({}), &CancellationToken::new())
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_current_types_are_comma_joined() {
    let (mut server, service) = mock_api().await;
    let mock = server
        .mock("GET", "/health/current")
        .match_query(query(&[("types", "3,12")]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    service
        .call_tool(
            "fetch_current_health",
            &json!({"types": [3, 12]}),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_upstream_error_preserves_status_and_body() {
    let (mut server, service) = mock_api().await;
    let body = r#"{"error":"database offline"}"#;
    let _mock = server
        .mock("GET", Matcher::Any)
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;

    let uris = [
        "senechal://health/summary/week",
        "senechal://health/profile",
        "senechal://health/current",
        "senechal://health/trends",
        "senechal://health/stats",
        "senechal://health/availablemetrics",
    ];
    for uri in uris {
        let err = service
            .read_resource(uri, &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            AdapterError::UpstreamError {
                status: 500,
                body: body.to_string(),
            },
            "{}",
            uri
        );
        assert!(!err.is_client_error());
    }
}

#[tokio::test]
async fn test_markdown_passes_through() {
    let (mut server, service) = mock_api().await;
    let markdown = "# Available metrics\n\n- steps\n- sleep\n";
    let _mock = server
        .mock("GET", "/health/availablemetrics")
        .with_status(200)
        .with_header("content-type", "text/markdown; charset=utf-8")
        .with_body(markdown)
        .create_async()
        .await;

    let result = service
        .call_tool("fetch_available_metrics", &json!({}), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.content_type, "text/markdown");
    assert_eq!(result.payload, Payload::Text(markdown.to_string()));
    assert_eq!(result.to_text(), markdown);
}

#[tokio::test]
async fn test_malformed_json_is_upstream_error() {
    let (mut server, service) = mock_api().await;
    let _mock = server
        .mock("GET", "/health/stats")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{not json")
        .create_async()
        .await;

    let err = service
        .read_resource("senechal://health/stats", &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        AdapterError::UpstreamError { status, body } => {
            assert_eq!(status, 200);
            assert!(body.contains("failed to decode JSON"));
        }
        other => panic!("Expected UpstreamError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_upstream() {
    // Bind then drop to get a port nobody is listening on
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let service = service_for(&format!("http://127.0.0.1:{}", port));

    let err = service
        .read_resource("senechal://health/profile", &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(
        matches!(err, AdapterError::UpstreamUnavailable(_)),
        "got {:?}",
        err
    );
}

#[tokio::test]
async fn test_base_url_path_prefix_is_kept() {
    let mut server = Server::new_async().await;
    let service = service_for(&format!("{}/api/", server.url()));
    let mock = server
        .mock("GET", "/api/health/profile")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .create_async()
        .await;

    service
        .read_resource("senechal://health/profile", &CancellationToken::new())
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_invalid_input_never_reaches_upstream() {
    let (mut server, service) = mock_api().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let cancel = CancellationToken::new();
    let failures = [
        service
            .read_resource("senechal://health/summary/hour", &cancel)
            .await,
        service
            .read_resource("senechal://health/weather", &cancel)
            .await,
        service
            .call_tool("fetch_health_stats", &json!({"days": 0}), &cancel)
            .await,
        service
            .call_tool("fetch_health_summary", &json!({"span": 2}), &cancel)
            .await,
        service.call_tool("fetch_weather", &json!({}), &cancel).await,
    ];
    for failure in failures {
        let err = assert_err!(failure);
        assert!(err.is_client_error(), "{:?}", err);
    }

    mock.assert_async().await;
}

#[tokio::test]
async fn test_uri_and_tool_send_identical_requests() {
    let upstream = Arc::new(MockUpstream::new());
    let service = HealthService::new(upstream.clone());
    let cancel = CancellationToken::new();

    service
        .read_resource(
            "senechal://health/summary/month?metrics=steps,sleep&span=3&offset=1",
            &cancel,
        )
        .await
        .unwrap();
    service
        .call_tool(
            "fetch_health_summary",
            &json!({"period": "month", "metrics": ["steps", "sleep"], "span": 3, "offset": 1}),
            &cancel,
        )
        .await
        .unwrap();

    let requests = upstream.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0], requests[1]);
    assert_eq!(requests[0].operation, Operation::Summary);
}

#[tokio::test]
async fn test_cancelled_call_returns_promptly() {
    let upstream = Arc::new(MockUpstream::new().with_delay(std::time::Duration::from_secs(30)));
    let service = HealthService::new(upstream.clone());
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let started = std::time::Instant::now();
    let err = service
        .call_tool("fetch_health_stats", &json!({}), &cancel)
        .await
        .unwrap_err();

    assert_eq!(err, AdapterError::Cancelled);
    assert!(started.elapsed() < std::time::Duration::from_secs(5));
    assert_eq!(upstream.requests().len(), 1);
}

#[test]
fn test_server_builds() {
    let service = HealthService::new(Arc::new(MockUpstream::new()));
    let server = McpServer::new(service);
    assert!(server.is_ok());
}

#[test]
fn test_registry_and_listing_cover_every_operation() {
    let service = HealthService::new(Arc::new(MockUpstream::new()));
    let registry = ToolRegistry::from_service(&service);
    assert_eq!(registry.all().len(), Operation::ALL.len());

    let entries = resource_entries();
    for operation in Operation::ALL {
        let path = format!("senechal://health/{}", operation.as_str());
        assert!(
            entries.iter().any(|e| e.uri.starts_with(&path)),
            "no resource listed for {}",
            operation
        );
    }
}

#[test]
fn test_blocking_runtime_call() {
    let upstream = Arc::new(MockUpstream::new());
    upstream.respond(
        "health/availablemetrics",
        Ok(senechal_mcp::UpstreamResult::text("# Metrics", "text/markdown")),
    );
    let service = HealthService::new(upstream);

    let result = assert_ok!(tokio_test::block_on(service.read_resource(
        "senechal://health/availablemetrics",
        &CancellationToken::new(),
    )));
    assert_eq!(result.to_text(), "# Metrics");
}
