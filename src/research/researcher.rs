use std::sync::Arc;

use async_trait::async_trait;
use minijinja::context;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::error::{ContentError, Result};
use crate::llm::{ChatMessage, CompletionClient, CompletionRequest};
use crate::models::{CompetitionAnalysis, ContentPlan, ResearchTopic};
use crate::prompts::{self, PromptLibrary};

use super::{Researcher, parse_json_response};

/// Researcher implementation backed by a chat-completion model
pub struct LlmResearcher {
    client: Arc<dyn CompletionClient>,
    prompts: Arc<PromptLibrary>,
    model: String,
}

/// `{"topics": [...]}` as returned by topic research
#[derive(Debug, Deserialize)]
struct TopicsResponse {
    topics: Vec<TopicSuggestion>,
}

#[derive(Debug, Deserialize)]
struct TopicSuggestion {
    title: String,
    keywords: Vec<String>,
    search_volume: Value,
    #[serde(deserialize_with = "nullable")]
    competition: Option<f64>,
    #[serde(default)]
    outline: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PlanResponse {
    outline: Vec<String>,
    key_points: Vec<String>,
    word_count: u32,
    references: Vec<String>,
    audience: String,
    writing_time: u32,
}

/// Key must be present; `null` is accepted.
fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

/// Models answer "medium", "High" or a raw number; keep whatever label they gave.
fn volume_label(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

impl From<TopicSuggestion> for ResearchTopic {
    fn from(suggestion: TopicSuggestion) -> Self {
        Self {
            title: suggestion.title,
            keywords: suggestion.keywords,
            search_volume: volume_label(suggestion.search_volume),
            competition: suggestion.competition,
            difficulty: None,
            estimated_traffic: None,
            content_brief: Some(suggestion.outline),
        }
    }
}

impl LlmResearcher {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        prompts: Arc<PromptLibrary>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            prompts,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a system + user prompt pair asking for a JSON object; return the raw text.
    async fn ask_json(&self, system: &str, prompt: String) -> Result<String> {
        let request = CompletionRequest::new(&self.model)
            .with_message(ChatMessage::system(system))
            .with_message(ChatMessage::user(prompt))
            .with_json_response();

        let completion = self.client.complete(request).await?;
        debug!(
            "Model response ({} completion tokens)",
            completion.usage.completion_tokens
        );
        Ok(completion.text)
    }
}

#[async_trait]
impl Researcher for LlmResearcher {
    async fn research_topics(&self, niche: &str, count: usize) -> Result<Vec<ResearchTopic>> {
        info!("Researching {} topics in niche: {}", count, niche);
        let prompt = self
            .prompts
            .render(prompts::RESEARCH, context! { count => count, niche => niche })?;

        let text = self.ask_json(prompts::RESEARCH_SYSTEM, prompt).await?;
        let response: TopicsResponse = parse_json_response(&text, "research results")
            .inspect_err(|e| error!("Failed to parse research results: {}", e))?;

        Ok(response.topics.into_iter().map(ResearchTopic::from).collect())
    }

    async fn create_content_plan(&self, topic: &ResearchTopic) -> Result<ContentPlan> {
        info!("Creating content plan for: {}", topic.title);
        let prompt = self.prompts.render(
            prompts::CONTENT_PLAN,
            context! { title => &topic.title, keywords => topic.keyword_list() },
        )?;

        let text = self.ask_json(prompts::PLANNING_SYSTEM, prompt).await?;
        let plan: PlanResponse = parse_json_response(&text, "content plan")
            .inspect_err(|e| error!("Failed to create content plan: {}", e))?;

        Ok(ContentPlan {
            topic: topic.clone(),
            outline: plan.outline,
            target_word_count: plan.word_count,
            key_points: plan.key_points,
            references: plan.references,
            target_audience: plan.audience,
            estimated_completion_time: plan.writing_time,
        })
    }

    async fn analyze_competition(&self, topic: &ResearchTopic) -> Result<CompetitionAnalysis> {
        info!("Analyzing competition for: {}", topic.title);
        let prompt = self.prompts.render(
            prompts::COMPETITION,
            context! { title => &topic.title, keywords => topic.keyword_list() },
        )?;

        let text = self.ask_json(prompts::STRATEGY_SYSTEM, prompt).await?;
        let value: Value = parse_json_response(&text, "competition analysis")
            .inspect_err(|e| error!("Failed to parse competition analysis: {}", e))?;

        match value {
            Value::Object(map) => Ok(map),
            other => {
                error!("Competition analysis is not a JSON object: {}", other);
                Err(ContentError::InvalidResponse(
                    "competition analysis must be a JSON object".to_string(),
                ))
            }
        }
    }
}
