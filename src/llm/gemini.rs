//! Google Gemini `generateContent` driver.
//!
//! Sends a single user turn and concatenates the text parts of the first
//! candidate. No streaming, no retries.

use serde_json::{Value, json};

use super::{CompletionDriver, LlmError, LlmSettings, char_counts, with_timeout};

/// Driver for the Gemini REST API (`/v1beta/models/{model}:generateContent`).
#[derive(Clone)]
pub struct GeminiDriver {
    http: reqwest::Client,
    settings: LlmSettings,
}

impl std::fmt::Debug for GeminiDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiDriver")
            .field("settings", &self.settings)
            .finish()
    }
}

impl GeminiDriver {
    /// Create a new Gemini driver with the given settings.
    #[must_use]
    pub fn new(settings: LlmSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
        }
    }

    fn request_body(&self, prompt: &str) -> Value {
        let mut body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }]
        });
        if self.settings.json_mode {
            body["generationConfig"] = json!({ "responseMimeType": "application/json" });
        }
        body
    }

    async fn send(&self, prompt: &str) -> Result<String, LlmError> {
        let url = self
            .settings
            .provider
            .build_url(&self.settings.base_url, &self.settings.model);

        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.settings.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Status { status, body });
        }

        let v: Value = resp.json().await?;
        extract_text(&v)
    }
}

/// Join the text parts of the first candidate.
fn extract_text(v: &Value) -> Result<String, LlmError> {
    if let Some(reason) = v["promptFeedback"]["blockReason"].as_str() {
        return Err(LlmError::EmptyResponse(format!("prompt blocked ({reason})")));
    }

    let parts = v["candidates"][0]["content"]["parts"]
        .as_array()
        .ok_or_else(|| {
            let finish = v["candidates"][0]["finishReason"]
                .as_str()
                .unwrap_or("no candidates");
            LlmError::EmptyResponse(finish.to_string())
        })?;

    Ok(parts
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect::<String>())
}

#[async_trait::async_trait]
impl CompletionDriver for GeminiDriver {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let started = std::time::Instant::now();
        let text = with_timeout(self.settings.timeout, self.send(prompt)).await?;
        let (prompt_chars, response_chars) = char_counts(prompt, &text);

        tracing::info!(
            name: "llm.request.completed",
            provider = "gemini",
            model = %self.settings.model,
            prompt_chars,
            response_chars,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Completion received"
        );

        Ok(text)
    }

    fn provider_name(&self) -> &'static str {
        self.settings.provider.display_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Provider;
    use axum::{Json, Router, http::HeaderMap, http::StatusCode, routing::post};
    use std::time::Duration;

    async fn spawn_mock(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn settings(base_url: String, timeout: Duration) -> LlmSettings {
        LlmSettings {
            base_url,
            api_key: "test-key".to_string(),
            model: "gemini-1.5-flash".to_string(),
            provider: Provider::Gemini,
            timeout,
            json_mode: true,
        }
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let v = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"key_points\":" }, { "text": "\"x\"}" }] }
            }]
        });
        assert_eq!(extract_text(&v).unwrap(), "{\"key_points\":\"x\"}");
    }

    #[test]
    fn test_extract_text_blocked_prompt() {
        let v = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        let err = extract_text(&v).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_request_body_json_mode() {
        let driver = GeminiDriver::new(settings("http://unused".into(), Duration::from_secs(1)));
        let body = driver.request_body("hello");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_complete_against_mock() {
        let app = Router::new().route(
            "/v1beta/models/{model}",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers["x-goog-api-key"], "test-key");
                let prompt = body["contents"][0]["parts"][0]["text"]
                    .as_str()
                    .unwrap_or_default()
                    .to_string();
                Json(json!({
                    "candidates": [{ "content": { "parts": [{ "text": format!("echo: {prompt}") }] } }]
                }))
            }),
        );
        let base = spawn_mock(app).await;
        let driver = GeminiDriver::new(settings(base, Duration::from_secs(5)));

        let text = driver.complete("ping").await.unwrap();
        assert_eq!(text, "echo: ping");
        assert_eq!(driver.provider_name(), "Gemini");
    }

    #[tokio::test]
    async fn test_complete_status_error() {
        let app = Router::new().route(
            "/v1beta/models/{model}",
            post(|| async { (StatusCode::FORBIDDEN, "API key not valid") }),
        );
        let base = spawn_mock(app).await;
        let driver = GeminiDriver::new(settings(base, Duration::from_secs(5)));

        let err = driver.complete("ping").await.unwrap_err();
        assert!(matches!(err, LlmError::Status { status, .. } if status == StatusCode::FORBIDDEN));
        assert!(err.to_string().contains("API key not valid"));
    }

    #[tokio::test]
    async fn test_complete_times_out() {
        let app = Router::new().route(
            "/v1beta/models/{model}",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({}))
            }),
        );
        let base = spawn_mock(app).await;
        let driver = GeminiDriver::new(settings(base, Duration::from_millis(200)));

        let err = driver.complete("ping").await.unwrap_err();
        assert!(matches!(err, LlmError::Timeout(_)));
    }
}
