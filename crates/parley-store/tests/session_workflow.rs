//! End-to-end workflow tests for `ChatSession` against a scripted backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Notify;

use parley_client::{AgentBackend, ClientError, Result as ClientResult};
use parley_store::{ChatSession, StoreError, GENERATION_FAILED_PLACEHOLDER};
use parley_types::{
    GraphInfo, InvokeMessage, InvokeRequest, InvokeResponse, ListParams, MessageRole,
    PingResponse, RemoteThread, StateSnapshot,
};

#[derive(Default)]
struct MockBackend {
    reply: Option<String>,
    fail_delete_state: bool,
    fail_delete_thread: bool,
    gate: Option<Arc<Notify>>,
    invocations: Mutex<Vec<InvokeRequest>>,
    state_deletes: AtomicUsize,
    thread_deletes: AtomicUsize,
}

impl MockBackend {
    fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            ..Self::default()
        }
    }

    fn failing() -> Self {
        Self::default()
    }

    fn invocations(&self) -> Vec<InvokeRequest> {
        self.invocations.lock().unwrap().clone()
    }
}

#[async_trait]
impl AgentBackend for MockBackend {
    async fn ping(&self) -> ClientResult<PingResponse> {
        Ok(PingResponse {
            status: 200,
            latency_ms: 1,
            body: Value::Null,
        })
    }

    async fn fetch_graph(&self) -> ClientResult<GraphInfo> {
        Ok(GraphInfo::default())
    }

    async fn invoke(&self, request: InvokeRequest) -> ClientResult<InvokeResponse> {
        self.invocations.lock().unwrap().push(request);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match &self.reply {
            Some(reply) => Ok(InvokeResponse {
                messages: vec![InvokeMessage {
                    role: MessageRole::Assistant,
                    content: reply.clone(),
                }],
            }),
            None => Err(ClientError::Server { status: 500 }),
        }
    }

    async fn list_threads(&self, _params: ListParams) -> ClientResult<Vec<RemoteThread>> {
        Ok(Vec::new())
    }

    async fn get_thread(&self, thread_id: &str) -> ClientResult<RemoteThread> {
        Err(ClientError::EndpointMissing {
            operation: format!("Thread {thread_id}"),
        })
    }

    async fn delete_thread(&self, _thread_id: &str) -> ClientResult<()> {
        self.thread_deletes.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete_thread {
            Err(ClientError::Server { status: 500 })
        } else {
            Ok(())
        }
    }

    async fn put_messages(
        &self,
        _thread_id: &str,
        _messages: Vec<InvokeMessage>,
    ) -> ClientResult<()> {
        Ok(())
    }

    async fn list_messages(
        &self,
        _thread_id: &str,
        _params: ListParams,
    ) -> ClientResult<Vec<InvokeMessage>> {
        Ok(Vec::new())
    }

    async fn get_message(
        &self,
        _thread_id: &str,
        _message_id: &str,
    ) -> ClientResult<InvokeMessage> {
        Err(ClientError::EndpointMissing {
            operation: "Message".into(),
        })
    }

    async fn delete_message(&self, _thread_id: &str, _message_id: &str) -> ClientResult<()> {
        Ok(())
    }

    async fn fetch_state(&self, _thread_id: &str) -> ClientResult<StateSnapshot> {
        Ok(StateSnapshot::default())
    }

    async fn put_state(&self, _thread_id: &str, _state: Value) -> ClientResult<()> {
        Ok(())
    }

    async fn delete_state(&self, _thread_id: &str) -> ClientResult<()> {
        self.state_deletes.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete_state {
            Err(ClientError::EndpointMissing {
                operation: "State".into(),
            })
        } else {
            Ok(())
        }
    }

    async fn fetch_state_schema(&self) -> ClientResult<Value> {
        Ok(Value::Null)
    }
}

fn session_with(backend: Arc<MockBackend>) -> ChatSession {
    ChatSession::new(backend)
}

#[tokio::test]
async fn send_round_trip_builds_expected_thread() {
    let backend = Arc::new(MockBackend::replying("Hi there"));
    let session = session_with(Arc::clone(&backend));

    let reply = session.send_message("Hello", None).await.unwrap();
    assert_eq!(reply.role, MessageRole::Assistant);
    assert_eq!(reply.content, "Hi there");

    let store = session.store();
    let store = store.lock().await;
    let thread = store.active_thread().unwrap();
    assert_eq!(thread.title, "Hello");
    assert_eq!(thread.messages.len(), 2);
    assert_eq!(thread.messages[0].role, MessageRole::User);
    assert_eq!(thread.messages[0].content, "Hello");
    assert_eq!(thread.messages[1].role, MessageRole::Assistant);
    assert_eq!(thread.messages[1].content, "Hi there");
    assert!(store.error().is_none());
    assert!(!session.is_generating(&thread.id));
}

#[tokio::test]
async fn failed_send_inserts_placeholder_and_records_error() {
    let backend = Arc::new(MockBackend::failing());
    let session = session_with(Arc::clone(&backend));

    let reply = session.send_message("Hello", None).await.unwrap();
    assert_eq!(reply.content, GENERATION_FAILED_PLACEHOLDER);

    let store = session.store();
    let store = store.lock().await;
    let thread = store.active_thread().unwrap();
    assert_eq!(thread.messages.len(), 2);
    assert_eq!(thread.messages[1].role, MessageRole::Assistant);
    assert_eq!(thread.messages[1].content, GENERATION_FAILED_PLACEHOLDER);
    assert!(store.error().is_some());
    assert!(!session.is_generating(&thread.id));
    // Exactly one request went out; nothing retries automatically.
    assert_eq!(backend.invocations().len(), 1);
}

#[tokio::test]
async fn send_merges_thread_execution_overrides() {
    let backend = Arc::new(MockBackend::replying("ok"));
    let session = session_with(Arc::clone(&backend));

    {
        let settings = session.thread_settings();
        let mut settings = settings.write().await;
        settings.set_recursion_limit(7);
        settings.set_streaming_response(true);
        settings
            .set_init_state_json(r#"{"mode": "debug"}"#)
            .unwrap();
    }

    session.send_message("Hello", None).await.unwrap();

    let invocations = backend.invocations();
    assert_eq!(invocations.len(), 1);
    let request = &invocations[0];
    assert_eq!(request.recursion_limit, 7);
    assert!(request.is_stream);
    assert_eq!(request.initial_state["mode"], "debug");
    assert_eq!(request.messages.len(), 1);
    assert_eq!(request.messages[0].content, "Hello");
}

#[tokio::test]
async fn concurrent_send_on_same_thread_is_rejected() {
    let gate = Arc::new(Notify::new());
    let backend = Arc::new(MockBackend {
        reply: Some("done".into()),
        gate: Some(Arc::clone(&gate)),
        ..MockBackend::default()
    });
    let session = Arc::new(session_with(Arc::clone(&backend)));

    let thread_id = {
        let store = session.store();
        let mut store = store.lock().await;
        store.create_thread(None).id
    };

    let first = {
        let session = Arc::clone(&session);
        let thread_id = thread_id.clone();
        tokio::spawn(async move { session.send_message("first", Some(&thread_id)).await })
    };

    // Wait until the first send is holding the slot.
    let mut waited = 0;
    while !session.is_generating(&thread_id) && waited < 100 {
        tokio::time::sleep(Duration::from_millis(2)).await;
        waited += 1;
    }
    assert!(session.is_generating(&thread_id));

    let second = session.send_message("second", Some(&thread_id)).await;
    assert!(matches!(second, Err(StoreError::SendInFlight(_))));

    gate.notify_one();
    first.await.unwrap().unwrap();
    assert!(!session.is_generating(&thread_id));
}

#[tokio::test]
async fn user_message_visible_before_completion() {
    let gate = Arc::new(Notify::new());
    let backend = Arc::new(MockBackend {
        reply: Some("late".into()),
        gate: Some(Arc::clone(&gate)),
        ..MockBackend::default()
    });
    let session = Arc::new(session_with(Arc::clone(&backend)));

    let thread_id = {
        let store = session.store();
        let mut store = store.lock().await;
        store.create_thread(None).id
    };

    let send = {
        let session = Arc::clone(&session);
        let thread_id = thread_id.clone();
        tokio::spawn(async move { session.send_message("optimistic", Some(&thread_id)).await })
    };

    let mut waited = 0;
    loop {
        {
            let store = session.store();
            let store = store.lock().await;
            if let Some(thread) = store.thread(&thread_id) {
                if !thread.messages.is_empty() {
                    assert_eq!(thread.messages[0].content, "optimistic");
                    assert_eq!(thread.messages[0].role, MessageRole::User);
                    break;
                }
            }
        }
        waited += 1;
        assert!(waited < 100, "optimistic append never became visible");
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    gate.notify_one();
    send.await.unwrap().unwrap();
}

#[tokio::test]
async fn send_to_unknown_thread_fails() {
    let backend = Arc::new(MockBackend::replying("ok"));
    let session = session_with(backend);

    let result = session.send_message("Hello", Some("missing")).await;
    assert!(matches!(result, Err(StoreError::ThreadNotFound(_))));
}

#[tokio::test]
async fn delete_thread_swallows_state_cleanup_failure() {
    let backend = Arc::new(MockBackend {
        fail_delete_state: true,
        ..MockBackend::default()
    });
    let session = session_with(Arc::clone(&backend));

    let (first_id, second_id) = {
        let store = session.store();
        let mut store = store.lock().await;
        let first = store.create_thread(Some("first")).id;
        let second = store.create_thread(Some("second")).id;
        (first, second)
    };

    // second is active; deleting it falls back to the remaining thread.
    session.delete_thread(&second_id).await.unwrap();

    assert_eq!(backend.state_deletes.load(Ordering::SeqCst), 1);
    assert_eq!(backend.thread_deletes.load(Ordering::SeqCst), 1);

    let store = session.store();
    let store = store.lock().await;
    assert!(store.thread(&second_id).is_none());
    assert_eq!(store.active_thread_id(), Some(first_id.as_str()));
}

#[tokio::test]
async fn delete_thread_propagates_thread_delete_failure() {
    let backend = Arc::new(MockBackend {
        fail_delete_thread: true,
        ..MockBackend::default()
    });
    let session = session_with(Arc::clone(&backend));

    let thread_id = {
        let store = session.store();
        let mut store = store.lock().await;
        store.create_thread(Some("keep me")).id
    };

    let result = session.delete_thread(&thread_id).await;
    assert!(matches!(result, Err(StoreError::Backend(_))));

    // The authoritative delete failed, so the thread stays local.
    let store = session.store();
    let store = store.lock().await;
    assert!(store.thread(&thread_id).is_some());
}

#[tokio::test]
async fn active_thread_drives_execution_settings_lifecycle() {
    let backend = Arc::new(MockBackend::replying("ok"));
    let session = session_with(backend);

    let thread_id = {
        let store = session.store();
        let mut store = store.lock().await;
        store.create_thread(Some("Weather")).id
    };

    session.set_active_thread(Some(&thread_id)).await;
    {
        let settings = session.thread_settings();
        let settings = settings.read().await;
        assert_eq!(settings.settings().thread_id, thread_id);
        assert_eq!(settings.settings().thread_title, "Weather");
    }

    session.set_active_thread(None).await;
    {
        let settings = session.thread_settings();
        let settings = settings.read().await;
        assert!(settings.settings().thread_id.is_empty());
    }
}
