//! Language-model collaborator interface.
//!
//! Everything generative is delegated to a chat-completion provider behind the
//! [`CompletionClient`] trait. [`OpenAiClient`] talks to an OpenAI-compatible
//! HTTP API; [`ScriptedClient`] replays canned responses for tests.

mod mock;
mod openai;
mod retry;

pub use mock::ScriptedClient;
pub use openai::OpenAiClient;
pub use retry::{RetryPolicy, retry_transient};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by a [`CompletionClient`].
#[derive(Error, Debug)]
pub enum LlmError {
    /// The request did not complete before the client timeout.
    #[error("Language model request timed out")]
    Timeout,

    /// Connection-level failure talking to the provider.
    #[error("HTTP error: {0}")]
    Transport(#[source] reqwest::Error),

    /// Provider quota or rate limit hit (HTTP 429).
    #[error("Rate limited by language model provider: {0}")]
    RateLimited(String),

    /// Non-success HTTP status other than 429.
    #[error("Language model API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The provider answered without any choices or message content.
    #[error("Language model returned an empty response")]
    EmptyResponse,

    /// The provider answered with a body that is not a completion.
    #[error("Failed to decode language model response: {0}")]
    Decode(String),

    #[error("No API key configured for the language model provider")]
    MissingApiKey,
}

impl LlmError {
    /// Whether retrying the same request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout | Self::Transport(_) | Self::RateLimited(_) => true,
            Self::Api { status, .. } => *status == 408 || *status >= 500,
            Self::EmptyResponse | Self::Decode(_) | Self::MissingApiKey => false,
        }
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err)
        }
    }
}

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Hint for the shape of the generated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Text,
    JsonObject,
}

/// A single chat-completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub response_format: Option<ResponseFormat>,
    pub temperature: Option<f32>,
    /// Upper bound on generated tokens
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            response_format: None,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_message(mut self, message: ChatMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_json_response(mut self) -> Self {
        self.response_format = Some(ResponseFormat::JsonObject);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Text of the last user message, if any.
    pub fn user_prompt(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }
}

/// Token usage counters reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }
}

/// Generated text plus usage.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub usage: TokenUsage,
}

/// A chat-completion provider.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, LlmError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(LlmError::Timeout.is_transient());
        assert!(LlmError::RateLimited("slow down".to_string()).is_transient());
        assert!(
            LlmError::Api {
                status: 503,
                body: String::new()
            }
            .is_transient()
        );
        assert!(
            LlmError::Api {
                status: 408,
                body: String::new()
            }
            .is_transient()
        );
        assert!(
            !LlmError::Api {
                status: 400,
                body: String::new()
            }
            .is_transient()
        );
        assert!(!LlmError::EmptyResponse.is_transient());
        assert!(!LlmError::MissingApiKey.is_transient());
    }

    #[test]
    fn test_request_builder() {
        let request = CompletionRequest::new("gpt-4")
            .with_message(ChatMessage::system("sys"))
            .with_message(ChatMessage::user("hello"))
            .with_json_response()
            .with_temperature(0.7)
            .with_max_tokens(2500);

        assert_eq!(request.model, "gpt-4");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.response_format, Some(ResponseFormat::JsonObject));
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.max_tokens, Some(2500));
        assert_eq!(request.user_prompt(), Some("hello"));
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&ChatMessage::system("x")).unwrap();
        assert_eq!(json, r#"{"role":"system","content":"x"}"#);
    }

    #[test]
    fn test_token_usage_total() {
        let usage = TokenUsage::new(10, 32);
        assert_eq!(usage.total_tokens, 42);
    }
}
