//! Request and response bodies for the backend's `/v1` surface.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::message::{Message, MessageRole};

/// A message as it travels over the wire, stripped of client-side metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvokeMessage {
    pub role: MessageRole,
    pub content: String,
}

impl From<&Message> for InvokeMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
        }
    }
}

/// Body for `POST /v1/graph/invoke`: one conversation turn, with the
/// thread-scoped execution overrides merged in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvokeRequest {
    pub messages: Vec<InvokeMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    pub recursion_limit: u32,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub initial_state: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub config: Map<String, Value>,
    pub is_stream: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_granularity: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvokeResponse {
    #[serde(default)]
    pub messages: Vec<InvokeMessage>,
}

impl InvokeResponse {
    /// The generated reply: content of the last assistant message, if any.
    pub fn assistant_reply(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::Assistant)
            .map(|m| m.content.as_str())
    }
}

/// Optional query parameters shared by the list endpoints.
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    pub search: Option<String>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl ListParams {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(search) = &self.search {
            query.push(("search", search.clone()));
        }
        if let Some(offset) = self.offset {
            query.push(("offset", offset.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        query
    }
}

/// A thread as the backend lists it. Backends differ on metadata shape, so
/// everything beyond the id is optional or free-form.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteThread {
    pub thread_id: String,
    #[serde(default)]
    pub thread_name: Option<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// Result of `GET /v1/ping`. Latency is measured by the client.
#[derive(Debug, Clone)]
pub struct PingResponse {
    pub status: u16,
    pub latency_ms: u64,
    pub body: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assistant_reply_takes_last_assistant_message() {
        let response: InvokeResponse = serde_json::from_str(
            r#"{"messages": [
                {"role": "user", "content": "Hello"},
                {"role": "assistant", "content": "first"},
                {"role": "assistant", "content": "second"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(response.assistant_reply(), Some("second"));
    }

    #[test]
    fn test_assistant_reply_none_without_assistant_message() {
        let response: InvokeResponse =
            serde_json::from_str(r#"{"messages": [{"role": "user", "content": "Hello"}]}"#)
                .unwrap();
        assert_eq!(response.assistant_reply(), None);
    }

    #[test]
    fn test_invoke_request_omits_empty_bags() {
        let request = InvokeRequest {
            messages: vec![],
            thread_id: None,
            recursion_limit: 25,
            initial_state: Map::new(),
            config: Map::new(),
            is_stream: false,
            response_granularity: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("initial_state").is_none());
        assert!(json.get("config").is_none());
        assert!(json.get("thread_id").is_none());
    }

    #[test]
    fn test_list_params_query() {
        let params = ListParams {
            search: Some("foo".into()),
            offset: None,
            limit: Some(10),
        };
        let query = params.to_query();
        assert_eq!(query.len(), 2);
        assert_eq!(query[0], ("search", "foo".to_string()));
        assert_eq!(query[1], ("limit", "10".to_string()));
    }
}
