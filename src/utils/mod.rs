//! Utility modules supporting upstream access.
//!
//! - [`HttpClient`]: shared `reqwest` client built from the upstream configuration

mod http;

pub use http::HttpClient;
