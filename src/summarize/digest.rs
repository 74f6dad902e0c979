//! The three-field digest returned by `/summarize`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Structured summary of a document.
///
/// Deserializing doubles as schema validation: the three fields must be
/// present and be strings. Any other keys the model produced are kept in
/// `extra` and serialized back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub key_points: String,
    pub risks: String,
    pub recommendations: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SummaryResult {
    pub fn new(
        key_points: impl Into<String>,
        risks: impl Into<String>,
        recommendations: impl Into<String>,
    ) -> Self {
        Self {
            key_points: key_points.into(),
            risks: risks.into(),
            recommendations: recommendations.into(),
            extra: Map::new(),
        }
    }

    /// Empty or whitespace-only input.
    pub fn no_text() -> Self {
        Self::new(
            "No text extracted.",
            "N/A",
            "Please provide text, URL, or document.",
        )
    }

    /// Non-URL input below the length threshold.
    pub fn input_too_short() -> Self {
        Self::new(
            "Input too short. AI-generated summary may be unreliable.",
            "⚠️ Verify content manually.",
            "Paste full text, URL, or upload a document.",
        )
    }

    /// Fetched page text below the length threshold.
    pub fn fetched_too_short() -> Self {
        Self::new(
            "Fetched content too short for reliable summary.",
            "⚠️ AI-generated summary. Verify manually.",
            "Provide full document or longer webpage.",
        )
    }

    /// The URL could not be fetched; `error` is surfaced to the user.
    pub fn fetch_failed(error: impl Into<String>) -> Self {
        Self::new("", "⚠️ Failed to fetch URL content", error)
    }

    /// Interpret raw model output.
    ///
    /// A JSON object carrying the three string fields (optionally inside a
    /// single Markdown code fence) is taken as-is; anything else is wrapped
    /// into `key_points` verbatim.
    pub fn from_model_output(raw: &str) -> Self {
        match serde_json::from_str::<Self>(strip_code_fence(raw)) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!(error = %e, "Model output is not a valid digest, wrapping raw text");
                Self::new(raw, "", "")
            }
        }
    }
}

/// Return the body of a single Markdown code fence, or `s` trimmed.
fn strip_code_fence(s: &str) -> &str {
    let trimmed = s.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some((_lang, body)) = rest.split_once('\n') else {
        return trimmed;
    };
    body.trim_end()
        .strip_suffix("```")
        .map_or(trimmed, str::trim)
}
