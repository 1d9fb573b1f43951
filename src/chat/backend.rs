//! Upstream chat backend client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ChatBackendConfig;

/// A generated reply.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub answer: String,
    pub model: String,
}

/// Errors from the chat backend. Mapped to 502 by the HTTP layer;
/// never exposes upstream detail to clients.
#[derive(Debug, Error)]
pub enum ChatBackendError {
    #[error("upstream request failed: {0}")]
    Upstream(String),

    #[error("upstream returned a malformed payload")]
    Malformed,
}

/// The seam between admission and response generation. Admitted
/// messages are forwarded unmodified.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn reply(&self, message: &str, session_id: &str) -> Result<ChatReply, ChatBackendError>;
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<CompletionMessage<'a>>,
}

#[derive(Serialize)]
struct CompletionMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionChoiceMessage,
}

#[derive(Deserialize)]
struct CompletionChoiceMessage {
    content: String,
}

/// HTTP client for an OpenAI-style `/chat/completions` endpoint.
pub struct UpstreamChatBackend {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl UpstreamChatBackend {
    pub fn new(config: &ChatBackendConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("HTTP client construction");

        let api_key = config
            .api_key_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok());

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        }
    }
}

#[async_trait]
impl ChatBackend for UpstreamChatBackend {
    async fn reply(&self, message: &str, session_id: &str) -> Result<ChatReply, ChatBackendError> {
        let body = CompletionRequest {
            model: &self.model,
            messages: vec![CompletionMessage {
                role: "user",
                content: message,
            }],
        };

        let mut request = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ChatBackendError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(
                session = %session_id,
                status = %status,
                "Chat backend returned error status"
            );
            return Err(ChatBackendError::Upstream(format!("status {status}")));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|_| ChatBackendError::Malformed)?;

        let answer = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(ChatBackendError::Malformed)?;

        Ok(ChatReply {
            answer,
            model: self.model.clone(),
        })
    }
}
