//! Shared application state.

use std::sync::Arc;

use tracing::info;

use crate::calendar::ContentStrategy;
use crate::config::{ServerConfig, ServiceConfig};
use crate::error::Result;
use crate::generator::ContentGenerator;
use crate::llm::{CompletionClient, OpenAiClient};
use crate::prompts::PromptLibrary;
use crate::research::LlmResearcher;

/// Service objects handed to every request handler.
///
/// Constructed once at startup; the calendar inside `strategy` is the only
/// mutable state and is guarded by its own mutex.
pub struct AppState {
    pub generator: ContentGenerator,
    pub strategy: ContentStrategy<LlmResearcher>,
    pub server: ServerConfig,
}

impl AppState {
    pub fn new(
        generator: ContentGenerator,
        strategy: ContentStrategy<LlmResearcher>,
        server: ServerConfig,
    ) -> Self {
        Self {
            generator,
            strategy,
            server,
        }
    }

    /// Wire the services against an explicit model client.
    pub fn with_client(config: &ServiceConfig, client: Arc<dyn CompletionClient>) -> Result<Self> {
        let prompts = Arc::new(PromptLibrary::load(config.prompts.dir.as_deref())?);

        let generator = ContentGenerator::new(client.clone(), prompts.clone(), &config.generation);
        let researcher = LlmResearcher::new(client, prompts, config.research.model.clone());

        Ok(Self::new(
            generator,
            ContentStrategy::new(researcher),
            config.server.clone(),
        ))
    }

    /// Wire the services against the configured OpenAI-compatible endpoint.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let client = OpenAiClient::new(&config.llm)?;
        info!(
            "Using {} (research: {}, generation: {})",
            config.llm.base_url, config.research.model, config.generation.model
        );
        Self::with_client(config, Arc::new(client))
    }
}
