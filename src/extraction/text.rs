//! Plain text extractor.
//!
//! Reads the upload as UTF-8 without any normalization.

use super::provider::{ExtractionError, Extractor};
use async_trait::async_trait;
use std::path::Path;

/// Extractor for `.txt` uploads.
#[derive(Debug, Default)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    /// Create a new plain text extractor.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Extractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let bytes = tokio::fs::read(path).await?;
        Ok(String::from_utf8(bytes)?)
    }

    fn name(&self) -> &'static str {
        "text"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_extract_text_file_verbatim() {
        let extractor = PlainTextExtractor::new();

        let mut temp_file = NamedTempFile::with_suffix(".txt").unwrap();
        write!(temp_file, "  Clause 1.\r\nThe tenant shall pay rent.\n").unwrap();

        let text = extractor.extract(temp_file.path()).await.unwrap();
        assert_eq!(text, "  Clause 1.\r\nThe tenant shall pay rent.\n");
    }

    #[tokio::test]
    async fn test_extract_empty_file() {
        let extractor = PlainTextExtractor::new();
        let temp_file = NamedTempFile::with_suffix(".txt").unwrap();

        let text = extractor.extract(temp_file.path()).await.unwrap();
        assert!(text.is_empty());
    }

    #[tokio::test]
    async fn test_extract_rejects_invalid_utf8() {
        let extractor = PlainTextExtractor::new();

        let mut temp_file = NamedTempFile::with_suffix(".txt").unwrap();
        temp_file.write_all(&[0x66, 0x6f, 0xff, 0xfe]).unwrap();

        let err = extractor.extract(temp_file.path()).await.unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidUtf8(_)));
        assert!(err.to_string().starts_with("file is not valid UTF-8"));
    }
}
