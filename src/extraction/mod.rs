//! Text extraction from uploaded documents.
//!
//! Uploads are classified by extension into a [`DocumentKind`] and handed to
//! the matching [`Extractor`]:
//!
//! - [`PdfExtractor`] - text layer of every page, via `lopdf`
//! - [`TesseractExtractor`] - OCR through the `tesseract` executable
//! - [`PlainTextExtractor`] - UTF-8 read verbatim
//!
//! # Usage
//!
//! ```rust,ignore
//! use legal_digest::extraction::{DocumentKind, ExtractorRegistry, ScratchDir};
//!
//! let registry = ExtractorRegistry::from_config(&config.extraction);
//! let file = scratch.persist("lease.pdf", &bytes).await?;
//! let text = registry.extract(DocumentKind::Pdf, file.path()).await?;
//! ```

mod factory;
mod ocr;
mod pdf;
mod provider;
mod scratch;
mod text;

pub use factory::ExtractorRegistry;
pub use ocr::TesseractExtractor;
pub use pdf::{PdfExtractor, extract_pdf_text};
pub use provider::{DocumentKind, ExtractionError, Extractor};
pub use scratch::{ScratchDir, ScratchFile, sanitize_filename};
pub use text::PlainTextExtractor;
