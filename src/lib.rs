//! # Senechal MCP
//!
//! A Model Context Protocol (MCP) server exposing the Senechal health-data API
//! to LLM clients as resources, tools and prompts.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Operations, typed parameter records, upstream request/result
//! - [`routing`]: Route table, resource URI matching and parameter normalization
//! - [`upstream`]: The gateway trait, its HTTP implementation and a mock
//! - [`service`]: The resolve → normalize → fetch pipeline
//! - [`mcp`]: MCP protocol surfaces and server
//! - [`config`]: Configuration management
//! - [`utils`]: HTTP client construction

pub mod config;
pub mod error;
pub mod mcp;
pub mod models;
pub mod routing;
pub mod service;
pub mod upstream;
pub mod utils;

// Re-export commonly used types
pub use error::AdapterError;
pub use models::{Operation, ParameterRecord, UpstreamRequest, UpstreamResult};
pub use service::HealthService;
pub use upstream::{HttpUpstream, MockUpstream, Upstream};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
