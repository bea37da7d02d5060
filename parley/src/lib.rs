//! # Parley: a client-side playground for agent-orchestration backends
//!
//! Parley gives a chat frontend everything it needs short of rendering:
//! conversation threads with optimistic sends, a two-step backend
//! verification workflow, durable connection settings, and per-thread
//! execution overrides, all over a typed HTTP client for the backend's
//! `/v1` surface.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use parley::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let playground = PlaygroundBuilder::new()
//!         .backend_url("https://agents.example.com")
//!         .auth_token("secret")
//!         .build()?;
//!
//!     // Confirm the backend is reachable and serving graph data.
//!     let verified = playground
//!         .verifier
//!         .verify_with(playground.backend.as_ref())
//!         .await;
//!     assert!(verified);
//!
//!     // Hold a conversation.
//!     let reply = playground.session.send_message("Hello!", None).await?;
//!     println!("{}", reply.content);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! Parley consists of three composable crates:
//!
//! - **parley-types**: threads, messages, graph metadata, invoke bodies
//! - **parley-client**: the `/v1` HTTP client and error taxonomy
//! - **parley-store**: chat store, send/delete workflows, verification
//!   sequencer, settings stores

pub mod builder;

pub use builder::{Playground, PlaygroundBuilder};

pub use parley_client::{AgentBackend, ClientError, ErrorCategory, HttpBackend};
pub use parley_store::{
    ChatSession, ChatStore, SettingsStore, StepStatus, StoreError, ThreadSettingsStore,
    VerificationSequencer, VerificationState, GENERATION_FAILED_PLACEHOLDER,
};
pub use parley_types::{
    GraphInfo, InvokeRequest, InvokeResponse, Message, MessageRole, Settings, StateSnapshot,
    Thread, ThreadExecutionSettings,
};

/// Common imports for building on Parley.
pub mod prelude {
    pub use crate::builder::{Playground, PlaygroundBuilder};
    pub use parley_client::{AgentBackend, ClientError, ErrorCategory, HttpBackend};
    pub use parley_store::{
        ChatSession, ChatStore, SettingsStore, StepStatus, StoreError, VerificationSequencer,
    };
    pub use parley_types::{Message, MessageRole, Settings, Thread};
}
