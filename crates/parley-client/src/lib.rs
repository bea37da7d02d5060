//! HTTP client for agent-orchestration backends.
//!
//! [`HttpBackend`] speaks the backend's `/v1` surface (ping, graph, invoke,
//! threads, messages, execution state) over `reqwest`, with bearer auth and a
//! per-category error taxonomy. Everything is exposed through the
//! [`AgentBackend`] trait so higher layers can be tested against a scripted
//! backend instead of a live server.

pub mod backend;
pub mod error;
pub mod http;
pub mod url;

pub use backend::AgentBackend;
pub use error::{ClientError, ErrorCategory, Result};
pub use http::HttpBackend;
pub use url::normalize_url;
