use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Execution-state snapshot for a thread, as served by
/// `GET /v1/threads/{id}/state`.
///
/// Backends extend the schema freely; anything beyond the well-known fields
/// is kept in `extra` so it survives a round trip through `PUT`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateSnapshot {
    #[serde(default)]
    pub context: Vec<Value>,
    #[serde(default)]
    pub context_summary: String,
    #[serde(default)]
    pub execution_meta: ExecutionMeta,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionMeta {
    #[serde(default)]
    pub current_node: String,
    #[serde(default)]
    pub step: u64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub interrupted_node: Vec<String>,
    #[serde(default)]
    pub interrupt_reason: String,
    #[serde(default)]
    pub thread_id: String,
}
