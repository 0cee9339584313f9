//! OpenAI-compatible chat completions gateway.
//!
//! Works against any service exposing `POST {base_url}/chat/completions`
//! with function tools.

use super::wire::{ChatRequest, ChatResponse};
use async_trait::async_trait;
use gitsmith_application::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession};
use gitsmith_domain::{ConversationThread, LlmResponse, ToolResult};
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";

struct Endpoint {
    http: reqwest::Client,
    url: String,
    model: String,
}

impl Endpoint {
    async fn complete(
        &self,
        thread: &ConversationThread,
        tools: &[serde_json::Value],
    ) -> Result<LlmResponse, GatewayError> {
        let request = ChatRequest::new(&self.model, thread, tools);
        debug!(
            model = %self.model,
            messages = request.messages.len(),
            tools = tools.len(),
            "chat completion request"
        );

        let response = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else {
                    GatewayError::ConnectionError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::Unauthorized(text),
                _ => GatewayError::RequestFailed {
                    status: status.as_u16(),
                    message: text,
                },
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        parsed
            .into_llm_response()
            .ok_or_else(|| GatewayError::InvalidResponse("response has no choices".to_string()))
    }
}

/// Gateway for OpenAI-compatible services
pub struct OpenAiGateway {
    endpoint: Arc<Endpoint>,
}

impl OpenAiGateway {
    pub fn new(api_key: &str) -> Result<Self, GatewayError> {
        Self::builder(api_key).build()
    }

    pub fn builder(api_key: &str) -> OpenAiGatewayBuilder {
        OpenAiGatewayBuilder {
            api_key: api_key.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: None,
        }
    }
}

pub struct OpenAiGatewayBuilder {
    api_key: String,
    base_url: String,
    model: String,
    timeout: Option<Duration>,
}

impl OpenAiGatewayBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Per-request timeout (none by default)
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<OpenAiGateway, GatewayError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|e| GatewayError::Unauthorized(format!("invalid API key: {}", e)))?,
        );

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        info!("OpenAiGateway initialized ({}, {})", url, self.model);

        Ok(OpenAiGateway {
            endpoint: Arc::new(Endpoint {
                http,
                url,
                model: self.model,
            }),
        })
    }
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    fn model(&self) -> &str {
        &self.endpoint.model
    }

    async fn create_session(&self) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(OpenAiSession::new(
            Arc::clone(&self.endpoint),
            ConversationThread::new(),
        )))
    }

    async fn create_session_with_system_prompt(
        &self,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(OpenAiSession::new(
            Arc::clone(&self.endpoint),
            ConversationThread::with_system_prompt(system_prompt),
        )))
    }
}

/// One conversation with an OpenAI-compatible service.
///
/// The whole thread is resent on every request. A failed request leaves the
/// thread as it was before the call, except that validated tool results stay
/// recorded. Results that cannot answer the pending calls drop the assistant
/// entry that asked for them, so later turns start from a well-formed thread.
pub struct OpenAiSession {
    endpoint: Arc<Endpoint>,
    thread: Mutex<ConversationThread>,
    tools: Mutex<Vec<serde_json::Value>>,
}

impl OpenAiSession {
    fn new(endpoint: Arc<Endpoint>, thread: ConversationThread) -> Self {
        Self {
            endpoint,
            thread: Mutex::new(thread),
            tools: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the conversation so far
    pub async fn thread(&self) -> ConversationThread {
        self.thread.lock().await.clone()
    }

    fn commit(thread: &mut ConversationThread, response: &LlmResponse) {
        thread.push_assistant(response.text_content(), response.tool_calls());
    }
}

#[async_trait]
impl LlmSession for OpenAiSession {
    fn model(&self) -> &str {
        &self.endpoint.model
    }

    async fn send_with_tools(
        &self,
        content: &str,
        tools: &[serde_json::Value],
    ) -> Result<LlmResponse, GatewayError> {
        let mut thread = self.thread.lock().await;
        let mut draft = thread.clone();
        draft.push_user(content);

        let response = self.endpoint.complete(&draft, tools).await?;
        Self::commit(&mut draft, &response);
        *thread = draft;
        *self.tools.lock().await = tools.to_vec();
        Ok(response)
    }

    async fn send_tool_results(&self, results: &[ToolResult]) -> Result<LlmResponse, GatewayError> {
        let mut thread = self.thread.lock().await;
        if let Err(e) = thread.record_tool_results(results) {
            warn!("Discarding unanswerable tool calls: {}", e);
            thread.discard_pending_tool_calls();
            return Err(e.into());
        }

        let tools = self.tools.lock().await.clone();
        let response = self.endpoint.complete(&thread, &tools).await?;
        Self::commit(&mut thread, &response);
        Ok(response)
    }
}
