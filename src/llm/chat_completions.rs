//! `OpenAI` Chat Completions API driver.
//!
//! Non-streaming variant of the Chat Completions protocol
//! (`/v1/chat/completions`) for OpenAI-compatible deployments.

use serde_json::{Value, json};

use super::{CompletionDriver, LlmError, LlmSettings, char_counts, with_timeout};

/// Driver for OpenAI-compatible Chat Completions endpoints.
#[derive(Clone)]
pub struct ChatCompletionsDriver {
    http: reqwest::Client,
    settings: LlmSettings,
}

impl std::fmt::Debug for ChatCompletionsDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsDriver")
            .field("settings", &self.settings)
            .finish()
    }
}

impl ChatCompletionsDriver {
    /// Create a new Chat Completions driver with the given settings.
    #[must_use]
    pub fn new(settings: LlmSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
        }
    }

    async fn send(&self, prompt: &str) -> Result<String, LlmError> {
        let url = self
            .settings
            .provider
            .build_url(&self.settings.base_url, &self.settings.model);

        let mut body = json!({
            "model": self.settings.model,
            "stream": false,
            "messages": [{ "role": "user", "content": prompt }],
        });
        if self.settings.json_mode {
            body["response_format"] = json!({ "type": "json_object" });
        }

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.settings.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Status { status, body });
        }

        let v: Value = resp.json().await?;
        v["choices"][0]["message"]["content"]
            .as_str()
            .map(ToString::to_string)
            .ok_or_else(|| {
                let finish = v["choices"][0]["finish_reason"]
                    .as_str()
                    .unwrap_or("no choices");
                LlmError::EmptyResponse(finish.to_string())
            })
    }
}

#[async_trait::async_trait]
impl CompletionDriver for ChatCompletionsDriver {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let text = with_timeout(self.settings.timeout, self.send(prompt)).await?;
        let (prompt_chars, response_chars) = char_counts(prompt, &text);

        tracing::info!(
            name: "llm.request.completed",
            provider = "openai",
            model = %self.settings.model,
            prompt_chars,
            response_chars,
            "Completion received"
        );

        Ok(text)
    }

    fn provider_name(&self) -> &'static str {
        self.settings.provider.display_name()
    }
}
