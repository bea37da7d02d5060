use std::collections::HashSet;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard};

use tokio::sync::{Mutex, RwLock};

use parley_client::{AgentBackend, ClientError};
use parley_types::{derive_title, InvokeMessage, Message, MessageRole};

use crate::chat::ChatStore;
use crate::error::{Result, StoreError};
use crate::thread_settings::ThreadSettingsStore;

/// Assistant message inserted when a send fails, so the conversation never
/// ends on a dangling user message.
pub const GENERATION_FAILED_PLACEHOLDER: &str =
    "Sorry, something went wrong while contacting the backend. Please try again.";

/// Drives the async conversation workflows over the chat store: optimistic
/// sends, two-phase deletes, and active-thread bookkeeping.
///
/// The store itself enforces a per-thread in-flight guard, so duplicate
/// concurrent sends fail with [`StoreError::SendInFlight`] even if a UI-level
/// guard is bypassed.
pub struct ChatSession {
    store: Arc<Mutex<ChatStore>>,
    backend: Arc<dyn AgentBackend>,
    thread_settings: Arc<RwLock<ThreadSettingsStore>>,
    in_flight: Arc<StdMutex<HashSet<String>>>,
}

/// Releases the per-thread send slot on drop, so the generating flag clears
/// on every exit path.
struct SendGuard {
    in_flight: Arc<StdMutex<HashSet<String>>>,
    thread_id: String,
}

impl Drop for SendGuard {
    fn drop(&mut self) {
        lock_set(&self.in_flight).remove(&self.thread_id);
    }
}

fn lock_set(set: &StdMutex<HashSet<String>>) -> MutexGuard<'_, HashSet<String>> {
    // Recover the set even if a holder panicked; it is just a flag registry.
    set.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ChatSession {
    pub fn new(backend: Arc<dyn AgentBackend>) -> Self {
        Self {
            store: Arc::new(Mutex::new(ChatStore::new())),
            backend,
            thread_settings: Arc::new(RwLock::new(ThreadSettingsStore::new())),
            in_flight: Arc::new(StdMutex::new(HashSet::new())),
        }
    }

    /// A session against a different backend that shares this session's
    /// conversation state, execution settings, and in-flight registry.
    /// Saving new connection settings must not discard local threads.
    pub fn with_backend(&self, backend: Arc<dyn AgentBackend>) -> Self {
        Self {
            store: Arc::clone(&self.store),
            backend,
            thread_settings: Arc::clone(&self.thread_settings),
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    pub fn store(&self) -> Arc<Mutex<ChatStore>> {
        Arc::clone(&self.store)
    }

    pub fn thread_settings(&self) -> Arc<RwLock<ThreadSettingsStore>> {
        Arc::clone(&self.thread_settings)
    }

    /// True while a send is outstanding for the thread.
    pub fn is_generating(&self, thread_id: &str) -> bool {
        lock_set(&self.in_flight).contains(thread_id)
    }

    fn begin_send(&self, thread_id: &str) -> Result<SendGuard> {
        let mut set = lock_set(&self.in_flight);
        if !set.insert(thread_id.to_string()) {
            return Err(StoreError::SendInFlight(thread_id.to_string()));
        }
        Ok(SendGuard {
            in_flight: Arc::clone(&self.in_flight),
            thread_id: thread_id.to_string(),
        })
    }

    /// Make a thread active (or none) and keep the execution settings in
    /// step: populated from the thread, or reset when nothing is active.
    pub async fn set_active_thread(&self, thread_id: Option<&str>) {
        let mut store = self.store.lock().await;
        match thread_id {
            Some(id) => store.set_active_thread(id),
            None => store.clear_active_thread(),
        }
        self.sync_thread_settings(&store).await;
    }

    async fn sync_thread_settings(&self, store: &ChatStore) {
        let mut settings = self.thread_settings.write().await;
        match store.active_thread() {
            Some(thread) => settings.activate(thread),
            None => settings.reset(),
        }
    }

    /// Send one conversation turn.
    ///
    /// The user message is appended optimistically before any network
    /// traffic; exactly one invoke request goes out, carrying the full
    /// message list and the thread-scoped execution overrides. On success the
    /// assistant reply is appended; on failure a fixed placeholder is
    /// appended instead and the error recorded on the store. Nothing retries
    /// automatically. Returns the appended assistant message.
    pub async fn send_message(&self, content: &str, thread_id: Option<&str>) -> Result<Message> {
        let target_id = self.resolve_target(content, thread_id).await?;
        let _guard = self.begin_send(&target_id)?;

        let request = {
            let mut store = self.store.lock().await;
            if !store.add_message(&target_id, content, MessageRole::User) {
                return Err(StoreError::ThreadNotFound(target_id));
            }
            let thread = store
                .thread(&target_id)
                .ok_or_else(|| StoreError::ThreadNotFound(target_id.clone()))?;
            let messages: Vec<InvokeMessage> =
                thread.messages.iter().map(InvokeMessage::from).collect();
            let settings = self.thread_settings.read().await;
            settings
                .settings()
                .invoke_request(messages, Some(target_id.clone()))
        };

        let outcome = self.backend.invoke(request).await.and_then(|response| {
            response
                .assistant_reply()
                .map(str::to_string)
                .ok_or_else(|| {
                    ClientError::InvalidResponse("response contained no assistant message".into())
                })
        });

        let mut store = self.store.lock().await;
        let reply = match outcome {
            Ok(reply) => {
                store.clear_error();
                reply
            }
            Err(err) => {
                tracing::error!(thread_id = %target_id, error = %err, "invoke failed");
                store.set_error(err.to_string());
                GENERATION_FAILED_PLACEHOLDER.to_string()
            }
        };
        store.add_message(&target_id, &reply, MessageRole::Assistant);
        store
            .thread(&target_id)
            .and_then(|t| t.messages.last())
            .cloned()
            .ok_or(StoreError::ThreadNotFound(target_id))
    }

    async fn resolve_target(&self, content: &str, thread_id: Option<&str>) -> Result<String> {
        let mut store = self.store.lock().await;
        match thread_id {
            Some(id) => {
                if store.thread(id).is_none() {
                    return Err(StoreError::ThreadNotFound(id.to_string()));
                }
                Ok(id.to_string())
            }
            None => {
                if let Some(id) = store.active_thread_id() {
                    return Ok(id.to_string());
                }
                let thread = store.create_thread(Some(&derive_title(content)));
                self.sync_thread_settings(&store).await;
                Ok(thread.id)
            }
        }
    }

    /// Delete a thread, remote first.
    ///
    /// Phase 1 removes any persisted execution state; that is speculative
    /// cleanup, so a failure is logged and swallowed (the state may simply
    /// not exist yet). Phase 2 deletes the thread resource itself and is
    /// authoritative: a failure propagates and the local collection is left
    /// untouched.
    pub async fn delete_thread(&self, thread_id: &str) -> Result<()> {
        if let Err(err) = self.backend.delete_state(thread_id).await {
            tracing::warn!(thread_id, error = %err, "state cleanup failed, continuing with thread delete");
        }
        self.backend.delete_thread(thread_id).await?;

        let mut store = self.store.lock().await;
        store.remove_thread(thread_id);
        self.sync_thread_settings(&store).await;
        Ok(())
    }
}
