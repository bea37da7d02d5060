use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::generate_id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub content: String,
    pub role: MessageRole,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl Message {
    /// Create a message with a fresh client-side id and current timestamp.
    pub fn new(content: impl Into<String>, role: MessageRole) -> Self {
        Self {
            id: generate_id(),
            content: content.into(),
            role,
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(content, MessageRole::User)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(content, MessageRole::Assistant)
    }
}
