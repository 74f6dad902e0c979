//! Extension-based dispatch to the format-specific extractors.

use super::ocr::TesseractExtractor;
use super::pdf::PdfExtractor;
use super::provider::{DocumentKind, ExtractionError, Extractor};
use super::text::PlainTextExtractor;
use crate::config::ExtractionConfig;
use std::path::Path;
use std::sync::Arc;

/// One extractor per [`DocumentKind`].
#[derive(Debug, Clone)]
pub struct ExtractorRegistry {
    pdf: Arc<dyn Extractor>,
    image: Arc<dyn Extractor>,
    text: Arc<dyn Extractor>,
}

impl ExtractorRegistry {
    /// Build the default extractors from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        tracing::info!(
            tesseract = %config.tesseract_path,
            language = %config.ocr_language,
            "Using lopdf for PDFs and tesseract for images"
        );
        Self::with_extractors(
            Arc::new(PdfExtractor::new()),
            Arc::new(TesseractExtractor::from_config(config)),
            Arc::new(PlainTextExtractor::new()),
        )
    }

    /// Assemble a registry from explicit extractors.
    pub fn with_extractors(
        pdf: Arc<dyn Extractor>,
        image: Arc<dyn Extractor>,
        text: Arc<dyn Extractor>,
    ) -> Self {
        Self { pdf, image, text }
    }

    pub fn for_kind(&self, kind: DocumentKind) -> &Arc<dyn Extractor> {
        match kind {
            DocumentKind::Pdf => &self.pdf,
            DocumentKind::Image => &self.image,
            DocumentKind::Text => &self.text,
        }
    }

    /// Run the extractor for `kind` over the file at `path`.
    pub async fn extract(&self, kind: DocumentKind, path: &Path) -> Result<String, ExtractionError> {
        let extractor = self.for_kind(kind);
        tracing::debug!(
            extractor = extractor.name(),
            path = %path.display(),
            "Dispatching extraction"
        );
        extractor.extract(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractionConfig;

    fn config() -> ExtractionConfig {
        ExtractionConfig {
            tesseract_path: "tesseract".to_string(),
            ocr_language: "eng".to_string(),
        }
    }

    #[test]
    fn test_dispatch_by_kind() {
        let registry = ExtractorRegistry::from_config(&config());
        assert_eq!(registry.for_kind(DocumentKind::Pdf).name(), "pdf");
        assert_eq!(registry.for_kind(DocumentKind::Image).name(), "ocr");
        assert_eq!(registry.for_kind(DocumentKind::Text).name(), "text");
    }

    #[tokio::test]
    async fn test_extract_text_kind() {
        let registry = ExtractorRegistry::from_config(&config());
        let file = tempfile::NamedTempFile::with_suffix(".txt").unwrap();
        tokio::fs::write(file.path(), "Governing law: Delaware.")
            .await
            .unwrap();

        let text = registry
            .extract(DocumentKind::Text, file.path())
            .await
            .unwrap();
        assert_eq!(text, "Governing law: Delaware.");
    }
}
