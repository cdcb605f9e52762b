//! Model response parsing.
//!
//! Vision models are instructed to answer with a bare JSON object but often
//! wrap it in prose or markdown fences. The parser takes the span from the
//! first `{` to the last `}` and parses that.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{EngineError, EngineResult};

/// Parses the JSON object embedded in a model response.
///
/// # Errors
///
/// Returns [`EngineError::ParseError`] when the text contains no `{ ... }`
/// span, or when the span is not valid JSON. In the latter case the error
/// carries the offending span.
///
/// # Example
///
/// ```
/// use receipt_engine::extraction::parse_model_response;
///
/// let text = "Here is the receipt:\n```json\n{\"total\": 64.00}\n```";
/// let payload = parse_model_response(text).unwrap();
/// assert_eq!(payload["total"], 64.0);
/// ```
pub fn parse_model_response(text: &str) -> EngineResult<Map<String, Value>> {
    let fragment = locate_json_object(text).ok_or_else(|| EngineError::ParseError {
        message: "no JSON object found in model response".to_string(),
        fragment: None,
    })?;

    debug!(
        response_length = text.len(),
        object_length = fragment.len(),
        "Located JSON object in model response"
    );

    serde_json::from_str::<Map<String, Value>>(fragment).map_err(|e| EngineError::ParseError {
        message: format!("invalid JSON in model response: {}", e),
        fragment: Some(fragment.to_string()),
    })
}

/// Returns the span from the first `{` through the last `}`, if they are ordered.
fn locate_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
