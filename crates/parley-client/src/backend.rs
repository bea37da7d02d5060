use async_trait::async_trait;
use serde_json::Value;

use parley_types::{
    GraphInfo, InvokeMessage, InvokeRequest, InvokeResponse, ListParams, PingResponse,
    RemoteThread, StateSnapshot,
};

use crate::error::Result;

/// Operations the agent backend exposes.
///
/// Stores and workflows depend on this seam rather than on a concrete HTTP
/// client, so tests can substitute a scripted backend.
#[async_trait]
pub trait AgentBackend: Send + Sync {
    /// Liveness check (`GET /v1/ping`).
    async fn ping(&self) -> Result<PingResponse>;

    /// Fetch the agent's graph topology (`GET /v1/graph`).
    async fn fetch_graph(&self) -> Result<GraphInfo>;

    /// Submit one conversation turn (`POST /v1/graph/invoke`).
    async fn invoke(&self, request: InvokeRequest) -> Result<InvokeResponse>;

    /// List threads (`GET /v1/threads`).
    async fn list_threads(&self, params: ListParams) -> Result<Vec<RemoteThread>>;

    /// Fetch one thread (`GET /v1/threads/{id}`).
    async fn get_thread(&self, thread_id: &str) -> Result<RemoteThread>;

    /// Delete a thread (`DELETE /v1/threads/{id}`).
    async fn delete_thread(&self, thread_id: &str) -> Result<()>;

    /// Persist messages into a thread (`POST /v1/threads/{id}/messages`).
    async fn put_messages(&self, thread_id: &str, messages: Vec<InvokeMessage>) -> Result<()>;

    /// List messages from a thread (`GET /v1/threads/{id}/messages`).
    async fn list_messages(
        &self,
        thread_id: &str,
        params: ListParams,
    ) -> Result<Vec<InvokeMessage>>;

    /// Fetch one message (`GET /v1/threads/{id}/messages/{mid}`).
    async fn get_message(&self, thread_id: &str, message_id: &str) -> Result<InvokeMessage>;

    /// Delete one message (`DELETE /v1/threads/{id}/messages/{mid}`).
    async fn delete_message(&self, thread_id: &str, message_id: &str) -> Result<()>;

    /// Fetch the execution state of a thread (`GET /v1/threads/{id}/state`).
    async fn fetch_state(&self, thread_id: &str) -> Result<StateSnapshot>;

    /// Override the execution state of a thread (`PUT /v1/threads/{id}/state`).
    async fn put_state(&self, thread_id: &str, state: Value) -> Result<()>;

    /// Delete any persisted execution state (`DELETE /v1/threads/{id}/state`).
    async fn delete_state(&self, thread_id: &str) -> Result<()>;

    /// Fetch the backend's state schema (`GET /v1/graph/stateSchema`).
    async fn fetch_state_schema(&self) -> Result<Value>;
}
