use parley_types::{derive_title, Message, MessageRole, Thread};

/// In-memory collection of conversation threads.
///
/// Single-writer: all mutation goes through the named operations below, and
/// each operation is synchronous and atomic with respect to the others. The
/// async send/delete workflows live in [`crate::session::ChatSession`].
#[derive(Debug, Default)]
pub struct ChatStore {
    threads: Vec<Thread>,
    active_thread_id: Option<String>,
    error: Option<String>,
}

impl ChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a thread and make it active. Newest threads sit at the head.
    pub fn create_thread(&mut self, title: Option<&str>) -> Thread {
        let thread = Thread::new(title);
        self.active_thread_id = Some(thread.id.clone());
        self.threads.insert(0, thread.clone());
        thread
    }

    pub fn thread(&self, thread_id: &str) -> Option<&Thread> {
        self.threads.iter().find(|t| t.id == thread_id)
    }

    fn thread_mut(&mut self, thread_id: &str) -> Option<&mut Thread> {
        self.threads.iter_mut().find(|t| t.id == thread_id)
    }

    pub fn threads(&self) -> &[Thread] {
        &self.threads
    }

    /// Threads ordered by descending `updated_at`. A projection recomputed
    /// per call, never stored.
    pub fn sorted_threads(&self) -> Vec<&Thread> {
        let mut sorted: Vec<&Thread> = self.threads.iter().collect();
        sorted.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        sorted
    }

    pub fn active_thread_id(&self) -> Option<&str> {
        self.active_thread_id.as_deref()
    }

    pub fn active_thread(&self) -> Option<&Thread> {
        self.active_thread_id
            .as_deref()
            .and_then(|id| self.thread(id))
    }

    pub fn set_active_thread(&mut self, thread_id: impl Into<String>) {
        self.active_thread_id = Some(thread_id.into());
    }

    pub fn clear_active_thread(&mut self) {
        self.active_thread_id = None;
    }

    /// Append a message to a thread.
    ///
    /// A missing thread is a silent no-op returning `false`. The first user
    /// message names a still-default-titled thread; once the title leaves
    /// "New Chat" it never re-derives.
    pub fn add_message(&mut self, thread_id: &str, content: &str, role: MessageRole) -> bool {
        let Some(thread) = self.thread_mut(thread_id) else {
            return false;
        };
        thread.messages.push(Message::new(content, role));
        thread.touch();

        if thread.has_default_title() && role == MessageRole::User {
            thread.title = derive_title(content);
        }
        true
    }

    /// Replace a message's content, refreshing its timestamp and the
    /// thread's `updated_at`.
    pub fn update_message(&mut self, thread_id: &str, message_id: &str, content: &str) -> bool {
        let Some(thread) = self.thread_mut(thread_id) else {
            return false;
        };
        let Some(message) = thread.messages.iter_mut().find(|m| m.id == message_id) else {
            return false;
        };
        message.content = content.to_string();
        message.timestamp = chrono::Utc::now();
        thread.touch();
        true
    }

    pub fn update_thread_title(&mut self, thread_id: &str, title: &str) -> bool {
        let Some(thread) = self.thread_mut(thread_id) else {
            return false;
        };
        thread.title = title.to_string();
        thread.touch();
        true
    }

    /// Empty a thread's message list. Individual messages are never removed
    /// locally.
    pub fn clear_messages(&mut self, thread_id: &str) -> bool {
        let Some(thread) = self.thread_mut(thread_id) else {
            return false;
        };
        thread.messages.clear();
        thread.touch();
        true
    }

    /// Remove a thread locally. If it was active, the pointer falls back to
    /// the first remaining thread, or `None` when the collection is empty.
    pub fn remove_thread(&mut self, thread_id: &str) -> bool {
        let before = self.threads.len();
        self.threads.retain(|t| t.id != thread_id);
        if self.threads.len() == before {
            return false;
        }
        if self.active_thread_id.as_deref() == Some(thread_id) {
            self.active_thread_id = self.threads.first().map(|t| t.id.clone());
        }
        true
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}
