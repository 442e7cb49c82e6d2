use serde::{Deserialize, Serialize};

/// Free-form competition analysis returned by the model.
///
/// The prompt asks for `gaps`, `angles`, `depth` and `differentiators`, but the
/// object is passed through as-is.
pub type CompetitionAnalysis = serde_json::Map<String, serde_json::Value>;

/// A blog topic suggested by topic research
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchTopic {
    pub title: String,
    /// Target keywords, in the order they should appear in prompts
    pub keywords: Vec<String>,
    /// Categorical estimate such as "low", "medium" or "high"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_volume: Option<String>,
    /// Competition level, nominally in 0..=1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competition: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_traffic: Option<u64>,
    /// Outline bullets suggested alongside the topic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_brief: Option<Vec<String>>,
}

impl ResearchTopic {
    /// Create a topic with only a title and keywords
    pub fn new(title: impl Into<String>, keywords: Vec<String>) -> Self {
        Self {
            title: title.into(),
            keywords,
            search_volume: None,
            competition: None,
            difficulty: None,
            estimated_traffic: None,
            content_brief: None,
        }
    }

    /// Keywords joined for prompt rendering. Empty when there are none.
    pub fn keyword_list(&self) -> String {
        self.keywords.join(", ")
    }
}

/// A detailed plan for writing one piece of content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPlan {
    pub topic: ResearchTopic,
    /// Section headings in reading order
    pub outline: Vec<String>,
    pub target_word_count: u32,
    pub key_points: Vec<String>,
    pub references: Vec<String>,
    pub target_audience: String,
    /// Estimated writing time in minutes
    pub estimated_completion_time: u32,
}

impl ContentPlan {
    pub fn title(&self) -> &str {
        &self.topic.title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_list_preserves_order() {
        let topic = ResearchTopic::new(
            "Budgeting 101",
            vec!["budget".to_string(), "savings".to_string(), "debt".to_string()],
        );
        assert_eq!(topic.keyword_list(), "budget, savings, debt");
    }

    #[test]
    fn test_keyword_list_empty() {
        let topic = ResearchTopic::new("No keywords", Vec::new());
        assert_eq!(topic.keyword_list(), "");
    }

    #[test]
    fn test_optional_fields_skipped_when_absent() {
        let topic = ResearchTopic::new("Title", vec!["k".to_string()]);
        let json = serde_json::to_value(&topic).unwrap();
        assert!(json.get("search_volume").is_none());
        assert!(json.get("content_brief").is_none());
    }
}
