//! Scratch storage for uploads.
//!
//! Every upload is written to a uniquely named file inside the scratch
//! directory and removed when its [`ScratchFile`] guard drops, whichever way
//! the request ends.

use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use unicode_normalization::UnicodeNormalization;

/// Longest file name common filesystems accept, in bytes.
const MAX_FILE_NAME: usize = 255;
const FILE_PREFIX: &str = "upload-";
const RANDOM_LEN: usize = 6;

/// Directory holding in-flight uploads.
#[derive(Debug, Clone)]
pub struct ScratchDir {
    root: PathBuf,
}

impl ScratchDir {
    /// Use `root` as the scratch directory, creating it if absent.
    pub fn create(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `bytes` to a fresh file whose name ends with `filename`.
    ///
    /// Over-long names are shortened before the extension so the stored
    /// name stays within 255 bytes.
    pub async fn persist(&self, filename: &str, bytes: &[u8]) -> io::Result<ScratchFile> {
        let file = tempfile::Builder::new()
            .prefix(FILE_PREFIX)
            .rand_bytes(RANDOM_LEN)
            .suffix(&stored_suffix(filename))
            .tempfile_in(&self.root)?;
        tokio::fs::write(file.path(), bytes).await?;
        Ok(ScratchFile { file })
    }
}

/// An upload on disk; deleted on drop.
#[derive(Debug)]
pub struct ScratchFile {
    file: NamedTempFile,
}

impl ScratchFile {
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// `-{filename}`, with the stem cut so prefix, random part and suffix fit
/// in [`MAX_FILE_NAME`] bytes.
fn stored_suffix(filename: &str) -> String {
    let budget = MAX_FILE_NAME - FILE_PREFIX.len() - RANDOM_LEN - 1;
    if filename.len() <= budget {
        return format!("-{filename}");
    }

    let (stem, ext) = match filename.rfind('.') {
        Some(i) if i > 0 && filename.len() - i < budget => filename.split_at(i),
        _ => (filename, ""),
    };
    let mut cut = budget - ext.len();
    while !stem.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("-{}{ext}", &stem[..cut])
}

/// Reduce a client-supplied filename to a safe, flat ASCII name.
///
/// The name is NFKD-normalized and folded to ASCII first (`é` becomes `e`,
/// fullwidth letters become their ASCII forms). Path separators then become
/// word breaks, whitespace runs become `_`, anything outside
/// `[A-Za-z0-9_.-]` is dropped and leading/trailing `.`/`_` are trimmed. The
/// result may be empty.
pub fn sanitize_filename(name: &str) -> String {
    let ascii: String = name
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");

    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}
