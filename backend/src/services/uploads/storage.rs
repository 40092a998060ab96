//! Writes uploaded documents to the uploads directory.
//!
//! Each upload gets its own directory, `<uploads_directory>/<upload_id>/`,
//! holding the document under its original filename and a `meta.json` sidecar
//! with the details the user typed in.

use crate::error::{StorageError, UploadError};
use common::model::upload::FileDetailsProps;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

pub const META_FILE_NAME: &str = "meta.json";

// Letters, marks, digits, whitespace, dot, underscore, hyphen, parentheses.
static FILENAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{L}\p{M}\p{N}\s._\-()]+$").expect("filename pattern is valid")
});

/// Contents of the `meta.json` sidecar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub upload_id: String,
    pub filename: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub custom_meta: HashMap<String, Value>,
    pub size: usize,
    pub md5: String,
}

/// Validates a client-supplied filename and returns it trimmed.
///
/// Rejects empty names, anything that could escape the upload directory, and
/// characters outside the allowed set.
pub fn sanitize_filename(name: &str) -> Result<String, UploadError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(UploadError::InvalidFilename("filename must not be empty".to_string()));
    }
    if name.contains('/')
        || name.contains('\\')
        || name.contains("..")
        || name.chars().all(|c| c == '.')
    {
        return Err(UploadError::InvalidFilename(format!("{name:?} is not a plain file name")));
    }
    if name == META_FILE_NAME {
        return Err(UploadError::InvalidFilename(format!("{name:?} is reserved")));
    }
    if !FILENAME_RE.is_match(name) {
        return Err(UploadError::InvalidFilename(format!(
            "{name:?} contains unsupported characters"
        )));
    }
    Ok(name.to_string())
}

/// Stores `bytes` and their sidecar for one upload and returns the sidecar.
///
/// `filename` must already have passed `sanitize_filename`.
pub fn store_document(
    uploads_directory: &Path,
    upload_id: &str,
    filename: &str,
    bytes: &[u8],
    details: &FileDetailsProps,
    custom_meta: HashMap<String, Value>,
) -> Result<StoredDocument, StorageError> {
    if bytes.is_empty() {
        return Err(StorageError::EmptyFile);
    }

    let dir = upload_dir(uploads_directory, upload_id);
    fs::create_dir_all(&dir)?;

    let mut writer = BufWriter::new(File::create(dir.join(filename))?);
    writer.write_all(bytes)?;
    writer.flush()?;

    let document = StoredDocument {
        upload_id: upload_id.to_string(),
        filename: filename.to_string(),
        title: details.title.clone(),
        description: details.description.clone(),
        custom_meta,
        size: bytes.len(),
        md5: format!("{:x}", md5::compute(bytes)),
    };
    let meta = File::create(dir.join(META_FILE_NAME))?;
    serde_json::to_writer_pretty(meta, &document)?;

    Ok(document)
}

pub fn upload_dir(uploads_directory: &Path, upload_id: &str) -> PathBuf {
    uploads_directory.join(upload_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sanitize_accepts_regular_names() {
        assert_eq!(sanitize_filename("  report (final).pdf ").unwrap(), "report (final).pdf");
        assert_eq!(sanitize_filename("résumé_2023-v2.docx").unwrap(), "résumé_2023-v2.docx");
    }

    #[test]
    fn test_sanitize_rejects_traversal_and_junk() {
        for bad in ["", "   ", "../etc/passwd", "a/b.txt", "a\\b.txt", "..", ".", "...", "meta.json", "a;rm.txt", "x<y>.md"] {
            assert!(
                matches!(sanitize_filename(bad), Err(UploadError::InvalidFilename(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_store_document_writes_file_and_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let details = FileDetailsProps::default().with_title("Paper");
        let meta = HashMap::from([("pages".to_string(), json!(3))]);

        let stored =
            store_document(dir.path(), "u1", "paper.txt", b"hello world", &details, meta).unwrap();

        let saved = fs::read(dir.path().join("u1").join("paper.txt")).unwrap();
        assert_eq!(saved, b"hello world");
        assert_eq!(stored.size, 11);
        assert_eq!(stored.md5, "5eb63bbbe01eeed093cb22bb8f5acdc3");

        let sidecar: StoredDocument = serde_json::from_slice(
            &fs::read(dir.path().join("u1").join(META_FILE_NAME)).unwrap(),
        )
        .unwrap();
        assert_eq!(sidecar, stored);
        assert_eq!(sidecar.title.as_deref(), Some("Paper"));
        assert_eq!(sidecar.description, None);
    }

    #[test]
    fn test_store_document_rejects_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = store_document(
            dir.path(),
            "u1",
            "empty.txt",
            b"",
            &FileDetailsProps::default(),
            HashMap::new(),
        );
        assert!(matches!(result, Err(StorageError::EmptyFile)));
        assert!(!dir.path().join("u1").exists());
    }
}
