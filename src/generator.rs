//! One-shot article generation.

use std::sync::Arc;

use minijinja::context;
use tracing::{error, info};

use crate::config::GenerationConfig;
use crate::error::Result;
use crate::llm::{ChatMessage, CompletionClient, CompletionRequest, RetryPolicy, retry_transient};
use crate::models::{ContentRequest, ContentResponse, max_tokens_for, word_guide_for};
use crate::prompts::{self, PromptLibrary};

/// Generates a complete article from a [`ContentRequest`] in a single model call.
pub struct ContentGenerator {
    client: Arc<dyn CompletionClient>,
    prompts: Arc<PromptLibrary>,
    model: String,
    temperature: f32,
    retry: RetryPolicy,
}

impl ContentGenerator {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        prompts: Arc<PromptLibrary>,
        config: &GenerationConfig,
    ) -> Self {
        Self {
            client,
            prompts,
            model: config.model.clone(),
            temperature: config.temperature,
            retry: config.retry.clone(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, request: &ContentRequest) -> Result<CompletionRequest> {
        let prompt = self.prompts.render(
            prompts::ARTICLE,
            context! {
                content_type => &request.content_type,
                topic => &request.topic,
                word_guide => word_guide_for(&request.length),
                tone => &request.tone,
                keywords => request.keywords.join(", "),
            },
        )?;

        Ok(CompletionRequest::new(&self.model)
            .with_message(ChatMessage::system(prompts::WRITER_SYSTEM))
            .with_message(ChatMessage::user(prompt))
            .with_temperature(self.temperature)
            .with_max_tokens(max_tokens_for(&request.length)))
    }

    /// Generate an article.
    ///
    /// Transient model failures are retried with bounded backoff; anything
    /// else, or the last transient failure, is returned to the caller.
    pub async fn generate(&self, request: &ContentRequest) -> Result<ContentResponse> {
        info!(
            "Generating {} ({}) about: {}",
            request.content_type, request.length, request.topic
        );
        let completion_request = self.build_request(request)?;

        let completion = retry_transient(&self.retry, || {
            self.client.complete(completion_request.clone())
        })
        .await
        .inspect_err(|e| error!("Content generation failed: {}", e))?;

        info!(
            "Generated {} characters ({} tokens)",
            completion.text.len(),
            completion.usage.total_tokens
        );

        Ok(ContentResponse {
            content: completion.text,
            usage: completion.usage,
            model: self.model.clone(),
        })
    }
}
