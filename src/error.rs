//! Error types shared across the crate.

use thiserror::Error;

use crate::llm::LlmError;

/// Result alias used by the library.
pub type Result<T> = std::result::Result<T, ContentError>;

/// Errors produced by research, planning, generation and serving.
#[derive(Error, Debug)]
pub enum ContentError {
    /// The language-model collaborator failed.
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// A model response was not valid JSON, or was missing required keys.
    #[error("Failed to parse {context}: {source}")]
    Parse {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A model response parsed but did not have the expected shape.
    #[error("Invalid model response: {0}")]
    InvalidResponse(String),

    /// A caller supplied an argument with no meaningful interpretation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A prompt template failed to load or render.
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Configuration could not be loaded or is incomplete.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing JSON output failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP server startup or runtime failure.
    #[error("Server error: {0}")]
    Server(String),
}

impl ContentError {
    pub(crate) fn parse(context: &'static str, source: serde_json::Error) -> Self {
        Self::Parse { context, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display_names_context() {
        let source = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = ContentError::parse("research results", source);
        assert!(err.to_string().starts_with("Failed to parse research results:"));
    }

    #[test]
    fn test_llm_error_is_transparent() {
        let err: ContentError = LlmError::EmptyResponse.into();
        assert_eq!(err.to_string(), LlmError::EmptyResponse.to_string());
    }

    #[test]
    fn test_invalid_input_display() {
        let err = ContentError::InvalidInput("posts_per_week must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid input: posts_per_week must be positive");
    }
}
