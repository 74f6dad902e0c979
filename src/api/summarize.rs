//! Summarize handler.

use axum::{body::Bytes, extract::State, http::StatusCode, response::Json};
use serde::Deserialize;
use serde_json::Value;

use super::error::{ApiRejection, reject};
use crate::AppState;
use crate::summarize::{SummarizeError, SummaryResult};

/// Request body for `/summarize`. A missing or null `text` counts as empty.
#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub text: Option<String>,
}

fn invalid_json(detail: impl std::fmt::Display) -> ApiRejection {
    reject(StatusCode::BAD_REQUEST, format!("Invalid JSON: {detail}"))
}

/// Parse the body; only a JSON object is a request.
fn parse_request(body: &[u8]) -> Result<SummarizeRequest, ApiRejection> {
    // Derived structs also deserialize from arrays.
    let Value::Object(fields) = serde_json::from_slice::<Value>(body).map_err(invalid_json)? else {
        return Err(invalid_json("expected an object"));
    };
    serde_json::from_value(Value::Object(fields)).map_err(invalid_json)
}

/// Summarize free text or the page behind a URL.
///
/// POST /summarize
///
/// Advisory digests (empty input, short input, unreachable URL) are returned
/// with 200. Provider failures are 500, provider timeouts 504.
pub async fn summarize_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SummaryResult>, ApiRejection> {
    let req = parse_request(&body)?;
    let text = req.text.unwrap_or_default();

    tracing::debug!(chars = text.chars().count(), "Summarize request received");

    match state.summarizer.summarize(&text).await {
        Ok(digest) => Ok(Json(digest)),
        Err(e) => {
            tracing::error!(error = %e, "Summarization failed");
            let status = match e {
                SummarizeError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                SummarizeError::Provider { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            };
            Err(reject(status, e.to_string()))
        }
    }
}
