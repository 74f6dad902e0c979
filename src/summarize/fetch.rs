//! URL fetching and visible-text extraction for link inputs.

use scraper::Html;
use std::time::Duration;
use url::Url;

/// Errors raised while fetching a linked page.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Network failure, timeout or non-2xx status.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// HTTP client for link inputs, with a fixed per-request timeout.
#[derive(Debug, Clone)]
pub struct UrlFetcher {
    http: reqwest::Client,
}

impl UrlFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }

    /// GET `url` and return the visible text of the HTML body.
    pub async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let parsed = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        let resp = self.http.get(parsed).send().await?.error_for_status()?;
        let body = resp.text().await?;

        Ok(html_to_text(&body))
    }
}

/// Visible text of an HTML document.
///
/// Every text node is trimmed; non-empty ones are joined with newlines.
/// Script, style and template content is skipped.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut lines: Vec<&str> = Vec::new();
    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .is_some_and(|e| matches!(e.name(), "script" | "style" | "template"))
        });
        if hidden {
            continue;
        }
        let t = text.trim();
        if !t.is_empty() {
            lines.push(t);
        }
    }
    lines.join("\n")
}
