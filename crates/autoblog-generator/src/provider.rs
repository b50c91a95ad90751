//! Text provider abstraction
//!
//! [`TextProvider`] is the seam between the generation pipeline and the
//! external API. [`OpenAiProvider`] talks to any OpenAI-compatible
//! `chat/completions` endpoint.

use crate::error::{Error, ProviderError};
use async_trait::async_trait;
use autoblog_core::OpenAiSettings;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Environment variable holding the API credential
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable overriding the endpoint
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";

/// Default endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Chat message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// Chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// One completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    /// Omitted from the wire request when `None`
    pub temperature: Option<f32>,
}

/// Completion result
///
/// `content` is `None` when the provider answered without text.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    pub content: Option<String>,
    pub model: String,
    pub finish_reason: Option<String>,
}

/// Text generation backend
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Run one completion request
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<CompletionResponse, ProviderError>;

    /// Model this provider sends requests for
    fn model_name(&self) -> &str;
}

// OpenAI-compatible wire format
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_completion_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-compatible provider
pub struct OpenAiProvider {
    client: Client,
    model: String,
    api_key: String,
    base_url: String,
}

impl OpenAiProvider {
    /// Create a provider for `model` at `base_url` (default endpoint if `None`)
    pub fn new(
        model: impl Into<String>,
        api_key: impl Into<String>,
        base_url: Option<String>,
    ) -> std::result::Result<Self, ProviderError> {
        let client = Client::builder()
            .connect_timeout(HTTP_CONNECT_TIMEOUT)
            .timeout(HTTP_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::Http(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client,
            model: model.into(),
            api_key: api_key.into(),
            base_url,
        })
    }

    /// Create a provider from settings and the process environment
    ///
    /// Fails with [`Error::MissingCredential`] when `OPENAI_API_KEY` is
    /// unset or empty. The endpoint comes from the settings, then
    /// `OPENAI_BASE_URL`, then the default.
    pub fn from_env(settings: &OpenAiSettings) -> std::result::Result<Self, Error> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(Error::MissingCredential(API_KEY_ENV))?;

        let base_url = settings
            .base_url
            .clone()
            .or_else(|| std::env::var(BASE_URL_ENV).ok().filter(|u| !u.is_empty()));

        Ok(Self::new(settings.model.clone(), api_key, base_url)?)
    }

    /// Endpoint root
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl TextProvider for OpenAiProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<CompletionResponse, ProviderError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: &request.messages,
            max_completion_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!("POST {} (model: {})", url, self.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ProviderError::from_status(status.as_u16(), error_text));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::InvalidResponse("No choices in response".to_string()))?;

        Ok(CompletionResponse {
            content: choice.message.content,
            model: completion.model.unwrap_or_else(|| self.model.clone()),
            finish_reason: choice.finish_reason,
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
