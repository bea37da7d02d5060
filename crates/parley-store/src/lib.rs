//! Conversation state and workflows for the Parley client.
//!
//! Four cooperating pieces:
//! - [`ChatStore`]: the in-memory thread/message collection, mutated only
//!   through named operations (single-writer discipline).
//! - [`ChatSession`]: the async workflows over the store: optimistic sends
//!   with guaranteed generating-flag cleanup, two-phase thread deletion.
//! - [`VerificationSequencer`]: the two-step backend connectivity check.
//! - [`SettingsStore`] / [`ThreadSettingsStore`]: durable connection settings
//!   and per-thread execution overrides with a strict parse boundary.

pub mod chat;
pub mod error;
pub mod session;
pub mod settings;
pub mod thread_settings;
pub mod verification;

pub use chat::ChatStore;
pub use error::{Result, StoreError};
pub use session::{ChatSession, GENERATION_FAILED_PLACEHOLDER};
pub use settings::SettingsStore;
pub use thread_settings::ThreadSettingsStore;
pub use verification::{StepState, StepStatus, VerificationSequencer, VerificationState};
