//! JSON extraction utilities for parsing model responses.

use serde::de::DeserializeOwned;

use crate::error::{ContentError, Result};

/// Extract a JSON block from model response text.
///
/// Handles two common patterns:
/// 1. JSON wrapped in ```json ... ``` code blocks
/// 2. Raw JSON objects (finds first { to last })
pub fn extract_json_block(text: &str) -> Option<&str> {
    if let Some(start) = text.find("```json") {
        let content_start = start + 7;
        if let Some(end) = text[content_start..].find("```") {
            return Some(text[content_start..content_start + end].trim());
        }
    }

    if let Some(start) = text.find('{')
        && let Some(end) = text.rfind('}')
        && start < end
    {
        return Some(&text[start..=end]);
    }

    None
}

/// Parse a model response as `T`.
///
/// The text is parsed directly first; if that fails, an embedded JSON block is
/// tried. The error from the direct parse is reported when both fail.
pub fn parse_json_response<T: DeserializeOwned>(text: &str, context: &'static str) -> Result<T> {
    let direct_err = match serde_json::from_str(text) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    match extract_json_block(text) {
        Some(block) if block != text => {
            serde_json::from_str(block).map_err(|e| ContentError::parse(context, e))
        }
        _ => Err(ContentError::parse(context, direct_err)),
    }
}
