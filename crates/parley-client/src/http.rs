use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use parley_types::{
    GraphInfo, InvokeMessage, InvokeRequest, InvokeResponse, ListParams, PingResponse,
    RemoteThread, StateSnapshot,
};

use crate::backend::AgentBackend;
use crate::error::{ClientError, Result};
use crate::url::normalize_url;

/// Deadline for everything except invoke.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Agent runs can take a long time; invoke gets its own deadline.
const INVOKE_TIMEOUT: Duration = Duration::from_secs(600);

/// `reqwest`-backed implementation of [`AgentBackend`].
///
/// The base URL is validated and normalized at construction, so every request
/// on a successfully built client targets a well-formed http(s) endpoint. A
/// bearer `Authorization` header is attached when a token is configured.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(backend_url: &str, auth_token: Option<&str>) -> Result<Self> {
        let base_url = normalize_url(backend_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = auth_token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ClientError::InvalidUrl("Invalid auth token format".into()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ClientError::Connection(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
    }

    async fn send(
        &self,
        builder: RequestBuilder,
        operation: &str,
        timeout: Duration,
    ) -> Result<Response> {
        let response = builder
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| ClientError::from_transport(e, timeout.as_secs()))?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::error!(operation, status = status.as_u16(), %body, "backend request failed");
            Err(ClientError::from_status(status.as_u16(), operation))
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, operation: &str) -> Result<T> {
        let response = self
            .send(self.request(Method::GET, path), operation, REQUEST_TIMEOUT)
            .await?;
        Self::decode(response).await
    }

    async fn delete_and_discard(&self, path: &str, operation: &str) -> Result<()> {
        self.send(self.request(Method::DELETE, path), operation, REQUEST_TIMEOUT)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl AgentBackend for HttpBackend {
    async fn ping(&self) -> Result<PingResponse> {
        let start = Instant::now();
        let response = self
            .send(self.request(Method::GET, "/v1/ping"), "Ping", REQUEST_TIMEOUT)
            .await?;
        let status = response.status();
        // Some backends answer ping with an empty body; that still counts.
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        Ok(PingResponse {
            status: status.as_u16(),
            latency_ms: start.elapsed().as_millis() as u64,
            body,
        })
    }

    async fn fetch_graph(&self) -> Result<GraphInfo> {
        self.get_json("/v1/graph", "Graph").await
    }

    async fn invoke(&self, request: InvokeRequest) -> Result<InvokeResponse> {
        let response = self
            .send(
                self.request(Method::POST, "/v1/graph/invoke").json(&request),
                "Invoke",
                INVOKE_TIMEOUT,
            )
            .await?;
        Self::decode(response).await
    }

    async fn list_threads(&self, params: ListParams) -> Result<Vec<RemoteThread>> {
        let response = self
            .send(
                self.request(Method::GET, "/v1/threads")
                    .query(&params.to_query()),
                "Threads",
                REQUEST_TIMEOUT,
            )
            .await?;
        Self::decode(response).await
    }

    async fn get_thread(&self, thread_id: &str) -> Result<RemoteThread> {
        self.get_json(&format!("/v1/threads/{}", thread_id), "Thread")
            .await
    }

    async fn delete_thread(&self, thread_id: &str) -> Result<()> {
        self.delete_and_discard(&format!("/v1/threads/{}", thread_id), "Thread")
            .await
    }

    async fn put_messages(&self, thread_id: &str, messages: Vec<InvokeMessage>) -> Result<()> {
        let body = serde_json::json!({ "messages": messages });
        self.send(
            self.request(Method::POST, &format!("/v1/threads/{}/messages", thread_id))
                .json(&body),
            "Messages",
            REQUEST_TIMEOUT,
        )
        .await?;
        Ok(())
    }

    async fn list_messages(
        &self,
        thread_id: &str,
        params: ListParams,
    ) -> Result<Vec<InvokeMessage>> {
        let response = self
            .send(
                self.request(Method::GET, &format!("/v1/threads/{}/messages", thread_id))
                    .query(&params.to_query()),
                "Messages",
                REQUEST_TIMEOUT,
            )
            .await?;
        Self::decode(response).await
    }

    async fn get_message(&self, thread_id: &str, message_id: &str) -> Result<InvokeMessage> {
        self.get_json(
            &format!("/v1/threads/{}/messages/{}", thread_id, message_id),
            "Message",
        )
        .await
    }

    async fn delete_message(&self, thread_id: &str, message_id: &str) -> Result<()> {
        self.delete_and_discard(
            &format!("/v1/threads/{}/messages/{}", thread_id, message_id),
            "Message",
        )
        .await
    }

    async fn fetch_state(&self, thread_id: &str) -> Result<StateSnapshot> {
        self.get_json(&format!("/v1/threads/{}/state", thread_id), "State")
            .await
    }

    async fn put_state(&self, thread_id: &str, state: Value) -> Result<()> {
        self.send(
            self.request(Method::PUT, &format!("/v1/threads/{}/state", thread_id))
                .json(&state),
            "State",
            REQUEST_TIMEOUT,
        )
        .await?;
        Ok(())
    }

    async fn delete_state(&self, thread_id: &str) -> Result<()> {
        self.delete_and_discard(&format!("/v1/threads/{}/state", thread_id), "State")
            .await
    }

    async fn fetch_state_schema(&self) -> Result<Value> {
        self.get_json("/v1/graph/stateSchema", "State schema").await
    }
}
