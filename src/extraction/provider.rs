//! Core trait and types for text extractors.

use async_trait::async_trait;
use std::path::Path;

/// Document families the service knows how to extract, keyed by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// `.pdf`: text layer of every page.
    Pdf,
    /// `.png`, `.jpg`, `.jpeg`: OCR over the full image.
    Image,
    /// `.txt`: UTF-8 read verbatim.
    Text,
}

impl DocumentKind {
    /// Classify a (sanitized) filename by its suffix, case-insensitively.
    ///
    /// Returns `None` for anything outside the supported set.
    pub fn from_filename(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".pdf") {
            Some(Self::Pdf)
        } else if [".png", ".jpg", ".jpeg"]
            .iter()
            .any(|ext| lower.ends_with(ext))
        {
            Some(Self::Image)
        } else if lower.ends_with(".txt") {
            Some(Self::Text)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Image => "image",
            Self::Text => "text",
        }
    }
}

/// Errors that can occur during extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// The PDF could not be parsed.
    #[error("invalid PDF: {0}")]
    Pdf(String),

    /// The OCR engine could not be run or reported a failure.
    #[error("OCR failed: {0}")]
    Ocr(String),

    /// A text upload was not valid UTF-8.
    #[error("file is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// An I/O error occurred while reading the file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A blocking extraction task panicked or was cancelled.
    #[error("extraction task failed: {0}")]
    Task(String),
}

/// Trait for format-specific extractors.
///
/// Implementors read the file at `path` and return its plain text. An empty
/// string is a valid result (e.g. a PDF without a text layer).
#[async_trait]
pub trait Extractor: Send + Sync + std::fmt::Debug {
    /// Extract plain text from the file at `path`.
    async fn extract(&self, path: &Path) -> Result<String, ExtractionError>;

    /// Get the extractor name for logging and debugging.
    fn name(&self) -> &'static str;
}
