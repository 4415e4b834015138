//! Chat-completions client used to summarize extracted PDF text.
//!
//! Speaks the OpenAI-compatible `/chat/completions` protocol: one request per
//! document, the prompt as the system message and the document text as the
//! user message. The API key is handed to [`ChatClient::new`]; nothing is
//! read from the environment here.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{HttpConfig, LlmConfig};
use crate::utils::HttpClient;

/// Errors returned by the chat API client
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("No API key configured for the chat API")]
    MissingApiKey,

    #[error("Failed to create HTTP client: {0}")]
    Client(String),

    #[error("Request failed: {0}")]
    Network(String),

    #[error("Chat API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to parse chat API response: {0}")]
    Parse(String),

    #[error("Chat API returned no content")]
    EmptyResponse,
}

/// Something that can summarize a document under a system prompt
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, prompt: &str, text: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// OpenAI-compatible chat-completions client
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: HttpClient,
    api_key: String,
    model: String,
    base_url: String,
}

impl ChatClient {
    /// Create a client with an explicit API key and the `[llm]` settings.
    ///
    /// The user agent and connect timeout come from `[http]`; the overall
    /// request timeout is `llm.timeout_secs`.
    pub fn new(
        api_key: impl Into<String>,
        config: &LlmConfig,
        http_config: &HttpConfig,
    ) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey);
        }

        let http = HttpClient::from_config(&HttpConfig {
            timeout_secs: config.timeout_secs,
            ..http_config.clone()
        })
        .map_err(|e| LlmError::Client(e.to_string()))?;

        Ok(Self {
            http,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Send one system + user exchange and return the reply text
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };

        let response = self
            .http
            .post(&format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)
    }
}

#[async_trait]
impl Summarizer for ChatClient {
    async fn summarize(&self, prompt: &str, text: &str) -> Result<String, LlmError> {
        let summary = self.complete(prompt, text).await?;
        tracing::debug!(model = %self.model, chars = summary.len(), "Text summarized");
        Ok(summary)
    }
}
