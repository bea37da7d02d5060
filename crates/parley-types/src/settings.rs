use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::{InvokeMessage, InvokeRequest};

pub const DEFAULT_RECURSION_LIMIT: u32 = 25;

/// Backend connection tuple. Persisted as a single JSON record; the field
/// names match the original storage format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "backendUrl")]
    pub backend_url: String,
    #[serde(default, rename = "authToken", skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

impl Settings {
    pub fn new(
        name: impl Into<String>,
        backend_url: impl Into<String>,
        auth_token: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            backend_url: backend_url.into(),
            auth_token,
        }
    }

    /// Derived, never stored: configured means a non-empty trimmed URL.
    pub fn is_backend_configured(&self) -> bool {
        !self.backend_url.trim().is_empty()
    }
}

/// Per-thread overrides merged into outbound invoke requests, plus read-only
/// usage counters reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadExecutionSettings {
    pub thread_id: String,
    pub thread_title: String,
    pub config: Map<String, Value>,
    pub init_state: Map<String, Value>,
    pub streaming_response: bool,
    pub recursion_limit: u32,
    #[serde(default)]
    pub usage: UsageCounters,
}

impl Default for ThreadExecutionSettings {
    fn default() -> Self {
        Self {
            thread_id: String::new(),
            thread_title: String::new(),
            config: Map::new(),
            init_state: Map::new(),
            streaming_response: false,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            usage: UsageCounters::default(),
        }
    }
}

impl ThreadExecutionSettings {
    /// Build the invoke body for one conversation turn with these overrides
    /// merged in.
    pub fn invoke_request(
        &self,
        messages: Vec<InvokeMessage>,
        thread_id: Option<String>,
    ) -> InvokeRequest {
        InvokeRequest {
            messages,
            thread_id,
            recursion_limit: self.recursion_limit,
            initial_state: self.init_state.clone(),
            config: self.config.clone(),
            is_stream: self.streaming_response,
            response_granularity: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageCounters {
    #[serde(default)]
    pub total_messages: u64,
    #[serde(default)]
    pub total_tokens: u64,
    #[serde(default)]
    pub total_tool_calls: u64,
    #[serde(default)]
    pub total_human_messages: u64,
    #[serde(default)]
    pub total_ai_messages: u64,
}
