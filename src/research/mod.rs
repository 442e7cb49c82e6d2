mod json_utils;
pub mod researcher;

pub use json_utils::{extract_json_block, parse_json_response};
pub use researcher::*;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{CompetitionAnalysis, ContentPlan, ResearchTopic};

/// Topic research, plan elaboration and competition analysis.
///
/// Each call is one outbound model request. Failures propagate; nothing is
/// retried or defaulted at this layer.
#[async_trait]
pub trait Researcher: Send + Sync {
    /// Suggest `count` topics for a niche, in the order the model returned them
    async fn research_topics(&self, niche: &str, count: usize) -> Result<Vec<ResearchTopic>>;

    /// Elaborate one topic into a content plan
    async fn create_content_plan(&self, topic: &ResearchTopic) -> Result<ContentPlan>;

    /// Analyze competing content for a topic
    async fn analyze_competition(&self, topic: &ResearchTopic) -> Result<CompetitionAnalysis>;
}
