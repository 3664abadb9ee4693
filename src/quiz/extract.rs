//! Pulls the question array out of raw model output.
//!
//! Models asked for "raw JSON only" still wrap it in code fences or add a
//! sentence around it often enough that the array is located by its outer
//! brackets rather than decoding the whole text.

use crate::errors::ParseError;
use serde_json::Value;

/// Extract the JSON array of raw question records from model output.
///
/// The records are returned untouched; validation happens when they are
/// ingested into quiz state.
pub fn extract(raw: &str) -> Result<Vec<Value>, ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyResponse);
    }

    let cleaned = strip_code_fence(trimmed);

    let start = cleaned.find('[').ok_or(ParseError::NoArrayFound)?;
    let end = cleaned.rfind(']').ok_or(ParseError::NoArrayFound)?;
    if end <= start {
        return Err(ParseError::NoArrayFound);
    }

    let slice = &cleaned[start..=end];
    match serde_json::from_str::<Value>(slice) {
        Ok(Value::Array(records)) => Ok(records),
        Ok(_) => Err(ParseError::MalformedJson("expected an array".to_string())),
        Err(e) => {
            tracing::debug!(error = %e, "JSON parse error in model output");
            Err(ParseError::MalformedJson(e.to_string()))
        }
    }
}

/// Remove a surrounding ``` fence (optionally tagged `json`).
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = match rest.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
        _ => rest,
    };
    let rest = rest.trim_end();
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}
