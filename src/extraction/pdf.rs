//! PDF text-layer extractor.
//!
//! Concatenates the text of every page in page order using `lopdf`. Pages
//! without a decodable text layer contribute nothing; scanned PDFs therefore
//! come back empty (there is no OCR fallback).

use super::provider::{ExtractionError, Extractor};
use async_trait::async_trait;
use lopdf::Document;
use std::path::Path;

/// Extractor for `.pdf` uploads.
#[derive(Debug, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

/// Extract the text layer of an in-memory PDF.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let doc = Document::load_mem(bytes).map_err(|e| ExtractionError::Pdf(e.to_string()))?;

    let mut text = String::new();
    for (page_num, _page_id) in doc.get_pages() {
        match doc.extract_text(&[page_num]) {
            Ok(content) => text.push_str(&content),
            Err(e) => {
                tracing::debug!(page = page_num, error = %e, "Page has no extractable text");
            }
        }
    }
    Ok(text)
}

#[async_trait]
impl Extractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let bytes = tokio::fs::read(path).await?;

        let text = tokio::task::spawn_blocking(move || extract_pdf_text(&bytes))
            .await
            .map_err(|e| ExtractionError::Task(e.to_string()))??;

        if text.trim().is_empty() {
            tracing::warn!(
                path = %path.display(),
                "PDF has no text layer (scanned document?), returning empty text"
            );
        }
        Ok(text)
    }

    fn name(&self) -> &'static str {
        "pdf"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Object, Stream, dictionary};

    /// Build a minimal PDF with one Courier text line per page.
    fn build_pdf(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids = Vec::new();
        for line in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new(
                        "Tf",
                        vec![Object::Name(b"F1".to_vec()), Object::Integer(24)],
                    ),
                    Operation::new("Td", vec![Object::Integer(100), Object::Integer(600)]),
                    Operation::new("Tj", vec![Object::string_literal(*line)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(Object::Reference(page_id));
        }

        let page_count = i64::try_from(kids.len()).unwrap();
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(page_count),
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(595),
                Object::Integer(842),
            ],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_extract_single_page() {
        let bytes = build_pdf(&["Lease Agreement"]);
        let text = extract_pdf_text(&bytes).unwrap();
        assert!(text.contains("Lease Agreement"));
    }

    #[test]
    fn test_pages_concatenated_in_order() {
        let bytes = build_pdf(&["First page", "Second page"]);
        let text = extract_pdf_text(&bytes).unwrap();

        let first = text.find("First page").unwrap();
        let second = text.find("Second page").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_corrupt_pdf_is_error() {
        let err = extract_pdf_text(b"this is not a pdf").unwrap_err();
        assert!(matches!(err, ExtractionError::Pdf(_)));
    }

    #[tokio::test]
    async fn test_extract_from_file() {
        let file = tempfile::NamedTempFile::with_suffix(".pdf").unwrap();
        tokio::fs::write(file.path(), build_pdf(&["Termination clause"]))
            .await
            .unwrap();

        let text = PdfExtractor::new().extract(file.path()).await.unwrap();
        assert!(text.contains("Termination clause"));
    }
}
