pub mod calendar;
pub mod config;
pub mod error;
pub mod generator;
pub mod llm;
pub mod models;
pub mod output;
pub mod prompts;
pub mod research;
pub mod server;
pub mod slug;

// Re-export main types
pub use calendar::{CalendarEntry, ContentCalendar, ContentStrategy, PlannedContent};
pub use config::ServiceConfig;
pub use error::{ContentError, Result};
pub use generator::ContentGenerator;
pub use llm::{CompletionClient, OpenAiClient, ScriptedClient};
pub use models::{CompetitionAnalysis, ContentPlan, ContentRequest, ContentResponse, ResearchTopic};
pub use output::{FileOutputWriter, OutputWriter};
pub use research::{LlmResearcher, Researcher};
pub use server::{AppState, create_router, serve};

// Re-export slug utilities
pub use slug::{slugify, slugify_truncate};
