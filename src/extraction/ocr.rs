//! OCR extractor backed by the `tesseract` command-line tool.
//!
//! The image is recognized as a whole (`tesseract <image> stdout -l <lang>`);
//! there is no region or layout detection.

use super::provider::{ExtractionError, Extractor};
use crate::config::ExtractionConfig;
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

/// Extractor for `.png` / `.jpg` / `.jpeg` uploads.
#[derive(Debug, Clone)]
pub struct TesseractExtractor {
    binary: String,
    language: String,
}

impl TesseractExtractor {
    pub fn new(binary: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            language: language.into(),
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(&config.tesseract_path, &config.ocr_language)
    }
}

#[async_trait]
impl Extractor for TesseractExtractor {
    async fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let output = Command::new(&self.binary)
            .arg(path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ExtractionError::Ocr(format!("failed to run {}: {e}", self.binary)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractionError::Ocr(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn name(&self) -> &'static str {
        "ocr"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_is_error() {
        let extractor = TesseractExtractor::new("/nonexistent/tesseract-bin", "eng");
        let image = tempfile::NamedTempFile::with_suffix(".png").unwrap();

        let err = extractor.extract(image.path()).await.unwrap_err();
        assert!(matches!(err, ExtractionError::Ocr(_)));
        assert!(err.to_string().contains("failed to run"));
    }

    #[cfg(unix)]
    fn fake_tesseract(dir: &Path, script: &str) -> std::path::PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("tesseract");
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_reads_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let bin = fake_tesseract(
            dir.path(),
            "#!/bin/sh\n[ \"$2\" = stdout ] || exit 2\necho \"NON-DISCLOSURE AGREEMENT ($4)\"\n",
        );
        let image = tempfile::NamedTempFile::with_suffix(".png").unwrap();

        let extractor = TesseractExtractor::new(bin.to_string_lossy(), "eng");
        let text = extractor.extract(image.path()).await.unwrap();
        assert_eq!(text, "NON-DISCLOSURE AGREEMENT (eng)\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_carries_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let bin = fake_tesseract(
            dir.path(),
            "#!/bin/sh\necho 'Error in pixReadStream' >&2\nexit 1\n",
        );
        let image = tempfile::NamedTempFile::with_suffix(".png").unwrap();

        let extractor = TesseractExtractor::new(bin.to_string_lossy(), "eng");
        let err = extractor.extract(image.path()).await.unwrap_err();
        assert!(err.to_string().contains("Error in pixReadStream"));
    }
}
