//! Core types for the Parley client: conversation threads and messages,
//! backend graph metadata, execution-state snapshots, and the request/response
//! bodies exchanged with an agent-orchestration backend.

pub mod api;
pub mod graph;
pub mod id;
pub mod message;
pub mod settings;
pub mod state;
pub mod thread;

pub use api::{
    InvokeMessage, InvokeRequest, InvokeResponse, ListParams, PingResponse, RemoteThread,
};
pub use graph::{GraphEdge, GraphInfo};
pub use id::generate_id;
pub use message::{Message, MessageRole};
pub use settings::{Settings, ThreadExecutionSettings, UsageCounters, DEFAULT_RECURSION_LIMIT};
pub use state::{ExecutionMeta, StateSnapshot};
pub use thread::{derive_title, Thread, DEFAULT_THREAD_TITLE};
