use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::generate_id;
use crate::message::Message;

/// Title given to a thread before the first user message names it.
pub const DEFAULT_THREAD_TITLE: &str = "New Chat";

const TITLE_MAX_CHARS: usize = 50;

/// A conversation container holding ordered messages.
///
/// Threads are client-owned: ids are generated locally unless the backend
/// assigns one, and the message list is append-only from the caller's
/// perspective (`clear` empties the whole list, single messages are never
/// removed locally).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Thread {
    pub fn new(title: Option<&str>) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(),
            title: title.unwrap_or(DEFAULT_THREAD_TITLE).to_string(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh `updated_at`. Called on every mutation.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn has_default_title(&self) -> bool {
        self.title == DEFAULT_THREAD_TITLE
    }
}

/// Derive a thread title from message content: the first 50 characters plus
/// an ellipsis when truncated, the content verbatim otherwise.
///
/// Counts characters rather than bytes so multi-byte content never splits
/// mid-codepoint.
pub fn derive_title(content: &str) -> String {
    if content.chars().count() > TITLE_MAX_CHARS {
        let head: String = content.chars().take(TITLE_MAX_CHARS).collect();
        format!("{}...", head)
    } else {
        content.to_string()
    }
}
