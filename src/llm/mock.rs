use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{Completion, CompletionClient, CompletionRequest, LlmError, TokenUsage};

/// A [`CompletionClient`] that replays queued outcomes in order and records
/// every request it receives.
///
/// Once the queue is empty every call fails with [`LlmError::EmptyResponse`].
#[derive(Default)]
pub struct ScriptedClient {
    outcomes: Mutex<VecDeque<Result<Completion, LlmError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful completion with the given text.
    pub async fn push_text(&self, text: impl Into<String>) {
        self.outcomes.lock().await.push_back(Ok(Completion {
            text: text.into(),
            usage: TokenUsage::new(10, 20),
        }));
    }

    /// Queue a JSON value as the completion text.
    pub async fn push_json(&self, value: serde_json::Value) {
        self.push_text(value.to_string()).await;
    }

    pub async fn push_error(&self, error: LlmError) {
        self.outcomes.lock().await.push_back(Err(error));
    }

    /// Requests received so far, oldest first.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, LlmError> {
        self.requests.lock().await.push(request);
        self.outcomes
            .lock()
            .await
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyResponse))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_in_order_then_fails() {
        let client = ScriptedClient::new();
        client.push_text("first").await;
        client.push_error(LlmError::Timeout).await;

        let first = client.complete(CompletionRequest::new("m")).await.unwrap();
        assert_eq!(first.text, "first");
        assert!(matches!(
            client.complete(CompletionRequest::new("m")).await,
            Err(LlmError::Timeout)
        ));
        assert!(matches!(
            client.complete(CompletionRequest::new("m")).await,
            Err(LlmError::EmptyResponse)
        ));
        assert_eq!(client.requests().await.len(), 3);
    }
}
