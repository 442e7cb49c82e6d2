use serde::{Deserialize, Serialize};

use crate::llm::TokenUsage;

/// Max tokens used when the requested length is not recognized
pub const DEFAULT_MAX_TOKENS: u32 = 2500;

/// Request for one-shot article generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRequest {
    pub topic: String,
    pub keywords: Vec<String>,
    #[serde(default = "default_tone")]
    pub tone: String,
    /// "short", "medium" or "long"; anything else falls back to medium sizing
    #[serde(default = "default_length")]
    pub length: String,
    #[serde(default = "default_content_type")]
    pub content_type: String,
}

fn default_tone() -> String {
    "professional".to_string()
}

fn default_length() -> String {
    "medium".to_string()
}

fn default_content_type() -> String {
    "blog_post".to_string()
}

impl ContentRequest {
    pub fn new(topic: impl Into<String>, keywords: Vec<String>) -> Self {
        Self {
            topic: topic.into(),
            keywords,
            tone: default_tone(),
            length: default_length(),
            content_type: default_content_type(),
        }
    }

    pub fn length(&self) -> Option<ContentLength> {
        ContentLength::parse(&self.length)
    }
}

/// Generated article plus provider bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentResponse {
    pub content: String,
    pub usage: TokenUsage,
    pub model: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentLength {
    Short,
    Medium,
    Long,
}

impl ContentLength {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "short" => Some(Self::Short),
            "medium" => Some(Self::Medium),
            "long" => Some(Self::Long),
            _ => None,
        }
    }

    /// Target word range embedded in the prompt
    pub fn word_guide(self) -> &'static str {
        match self {
            Self::Short => "800-1200 words",
            Self::Medium => "1500-2000 words",
            Self::Long => "2500-3000 words",
        }
    }

    pub fn max_tokens(self) -> u32 {
        match self {
            Self::Short => 1500,
            Self::Medium => 2500,
            Self::Long => 4000,
        }
    }
}

/// Max output tokens for a free-form length string.
pub fn max_tokens_for(length: &str) -> u32 {
    ContentLength::parse(length).map_or(DEFAULT_MAX_TOKENS, ContentLength::max_tokens)
}

/// Word-count guide for a free-form length string; unknown lengths use medium.
pub fn word_guide_for(length: &str) -> &'static str {
    ContentLength::parse(length)
        .unwrap_or(ContentLength::Medium)
        .word_guide()
}
