//! Summarization pipeline behind `POST /summarize`.
//!
//! Input is checked top to bottom, first match wins:
//!
//! 1. empty text: canned "No text extracted." digest
//! 2. `http://` / `https://` prefix: fetch the page; fetch errors and short
//!    pages produce canned advisory digests
//! 3. fewer than `min_chars` characters: canned "input too short" digest
//! 4. otherwise one completion call, normalized by [`SummaryResult::from_model_output`]
//!
//! Canned digests are successes, not errors. Only provider failures are.

mod digest;
mod fetch;

pub use digest::SummaryResult;
pub use fetch::{FetchError, UrlFetcher, html_to_text};

use crate::llm::{CompletionDriver, LlmError};
use std::sync::Arc;
use std::time::Duration;

/// Fixed instruction placed before the document text.
const PROMPT_HEADER: &str = "Summarize the following legal document into JSON with keys:
key_points, risks, recommendations.
Each value must be a single string.

Document Text:
";

/// Build the completion prompt; `text` is interpolated verbatim.
pub fn build_prompt(text: &str) -> String {
    format!("{PROMPT_HEADER}{text}\n")
}

/// Hard failures of the summarize pipeline.
#[derive(Debug, thiserror::Error)]
pub enum SummarizeError {
    #[error("{provider} API failed: {source}")]
    Provider {
        provider: &'static str,
        #[source]
        source: LlmError,
    },

    #[error("{provider} API timed out after {}s", .limit.as_secs())]
    Timeout {
        provider: &'static str,
        limit: Duration,
    },
}

/// Turns free text or a URL into a [`SummaryResult`].
#[derive(Debug, Clone)]
pub struct Summarizer {
    driver: Arc<dyn CompletionDriver>,
    fetcher: UrlFetcher,
    min_chars: usize,
}

impl Summarizer {
    pub fn new(driver: Arc<dyn CompletionDriver>, fetcher: UrlFetcher, min_chars: usize) -> Self {
        Self {
            driver,
            fetcher,
            min_chars,
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.driver.provider_name()
    }

    pub async fn summarize(&self, input: &str) -> Result<SummaryResult, SummarizeError> {
        let input = input.trim();
        if input.is_empty() {
            tracing::info!(name: "summarize.soft_fail", reason = "empty", "No text supplied");
            return Ok(SummaryResult::no_text());
        }

        let fetched;
        let text = if is_url(input) {
            match self.fetcher.fetch_text(input).await {
                Ok(page) => {
                    if page.chars().count() < self.min_chars {
                        tracing::info!(
                            name: "summarize.soft_fail",
                            reason = "fetched_too_short",
                            url = %input,
                            chars = page.chars().count(),
                            "Fetched page too short"
                        );
                        return Ok(SummaryResult::fetched_too_short());
                    }
                    fetched = page;
                    fetched.as_str()
                }
                Err(e) => {
                    tracing::warn!(
                        name: "summarize.soft_fail",
                        reason = "fetch_failed",
                        url = %input,
                        error = %e,
                        "Failed to fetch URL"
                    );
                    return Ok(SummaryResult::fetch_failed(e.to_string()));
                }
            }
        } else {
            input
        };

        if text.chars().count() < self.min_chars {
            tracing::info!(name: "summarize.soft_fail", reason = "too_short", "Input too short");
            return Ok(SummaryResult::input_too_short());
        }

        let prompt = build_prompt(text);
        let provider = self.driver.provider_name();
        match self.driver.complete(&prompt).await {
            Ok(raw) => Ok(SummaryResult::from_model_output(&raw)),
            Err(LlmError::Timeout(limit)) => Err(SummarizeError::Timeout { provider, limit }),
            Err(source) => Err(SummarizeError::Provider { provider, source }),
        }
    }
}

fn is_url(text: &str) -> bool {
    text.starts_with("http://") || text.starts_with("https://")
}
