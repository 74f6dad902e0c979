//! Completion drivers for hosted text-generation APIs.
//!
//! The summarizer sends exactly one prompt per request and needs the raw text
//! the model produced. Every provider sits behind the [`CompletionDriver`]
//! trait so handlers and tests can swap the transport.
//!
//! # Drivers
//!
//! - [`GeminiDriver`]: Google Gemini `generateContent` REST API
//! - [`ChatCompletionsDriver`]: any `OpenAI`-compatible `/v1/chat/completions` endpoint
//!
//! # Example
//!
//! ```rust,ignore
//! use legal_digest::llm::{LlmSettings, Provider, build_driver};
//!
//! let driver = build_driver(settings);
//! let text = driver.complete("Summarize ...").await?;
//! ```

pub mod chat_completions;
pub mod gemini;
pub mod provider;

pub use chat_completions::ChatCompletionsDriver;
pub use gemini::GeminiDriver;
pub use provider::Provider;

use std::sync::Arc;
use std::time::Duration;

/// Provider connection and model settings.
#[derive(Clone)]
pub struct LlmSettings {
    /// Base URL for the provider API (e.g., `https://generativelanguage.googleapis.com`).
    pub base_url: String,
    /// API key for authentication.
    pub api_key: String,
    /// Model identifier (e.g., `gemini-1.5-flash`).
    pub model: String,
    /// Wire protocol spoken by the provider.
    pub provider: Provider,
    /// Upper bound for one completion call.
    pub timeout: Duration,
    /// Ask the provider for a JSON response body when it supports it.
    pub json_mode: bool,
}

impl std::fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("provider", &self.provider)
            .field("timeout", &self.timeout)
            .field("json_mode", &self.json_mode)
            .finish()
    }
}

/// Errors raised by a completion call.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The provider did not answer within the configured timeout.
    #[error("timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// Transport-level failure (connect, TLS, body read).
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("provider returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response was well-formed but carried no text (e.g. blocked prompt).
    #[error("empty response: {0}")]
    EmptyResponse(String),
}

/// Trait for one-shot completion drivers.
#[async_trait::async_trait]
pub trait CompletionDriver: Send + Sync + std::fmt::Debug {
    /// Send `prompt` once and return the model's raw text.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    /// Provider name used in logs and error messages.
    fn provider_name(&self) -> &'static str;
}

/// Build the driver matching `settings.provider`.
pub fn build_driver(settings: LlmSettings) -> Arc<dyn CompletionDriver> {
    match settings.provider {
        Provider::Gemini => Arc::new(GeminiDriver::new(settings)),
        Provider::OpenAiCompatible => Arc::new(ChatCompletionsDriver::new(settings)),
    }
}

/// Run `fut` under `limit`, mapping elapsed time to [`LlmError::Timeout`].
pub(crate) async fn with_timeout<F, T>(limit: Duration, fut: F) -> Result<T, LlmError>
where
    F: std::future::Future<Output = Result<T, LlmError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(res) => res,
        Err(_) => Err(LlmError::Timeout(limit)),
    }
}

/// Prompt and response sizes in characters, as logged per completion.
pub(crate) fn char_counts(prompt: &str, response: &str) -> (usize, usize) {
    (prompt.chars().count(), response.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_counts_are_not_bytes() {
        let prompt = "§ 4 Kündigung: Vermieter darf fristlos kündigen.";
        let response = r#"{"risks":"⚠️ Räumung"}"#;
        let (prompt_chars, response_chars) = char_counts(prompt, response);
        assert_eq!(prompt_chars, 48);
        assert!(prompt_chars < prompt.len());
        assert_eq!(response_chars, response.chars().count());
        assert!(response_chars < response.len());
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_timeout_maps_elapsed() {
        let limit = Duration::from_secs(5);
        let result: Result<(), LlmError> = with_timeout(limit, async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(LlmError::Timeout(d)) if d == limit));
    }

    #[test]
    fn test_timeout_message() {
        let err = LlmError::Timeout(Duration::from_secs(60));
        assert_eq!(err.to_string(), "timed out after 60s");
    }

    #[test]
    fn test_settings_debug_redacts_key() {
        let settings = LlmSettings {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key: "secret-key".to_string(),
            model: "gemini-1.5-flash".to_string(),
            provider: Provider::Gemini,
            timeout: Duration::from_secs(60),
            json_mode: true,
        };
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("gemini-1.5-flash"));
    }
}
