//! Provider detection and URL construction.
//!
//! Gemini and `OpenAI`-compatible endpoints differ in path layout,
//! authentication header and request shape.

/// Supported completion providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Google Gemini (generativelanguage.googleapis.com)
    Gemini,
    /// Generic OpenAI-compatible provider (`OpenAI`, Groq, local servers, ...)
    OpenAiCompatible,
}

impl Provider {
    /// Detect provider from base URL.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let provider = Provider::detect_from_url("https://generativelanguage.googleapis.com");
    /// assert_eq!(provider, Provider::Gemini);
    /// ```
    #[must_use]
    pub fn detect_from_url(base_url: &str) -> Self {
        let lower = base_url.to_lowercase();

        if lower.contains("generativelanguage.googleapis.com") || lower.contains("gemini") {
            Self::Gemini
        } else {
            Self::OpenAiCompatible
        }
    }

    /// Name used as the prefix of provider failure messages.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Gemini => "Gemini",
            Self::OpenAiCompatible => "LLM",
        }
    }

    /// Build the completion URL for this provider.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL (trailing slash tolerated)
    /// * `model` - The model name (part of the path for Gemini)
    #[must_use]
    pub fn build_url(self, base_url: &str, model: &str) -> String {
        let base = base_url.trim_end_matches('/');

        match self {
            Self::Gemini => format!("{base}/v1beta/models/{model}:generateContent"),
            Self::OpenAiCompatible => format!("{base}/v1/chat/completions"),
        }
    }
}
