//! Document Text Extraction — raw text out of uploaded resume containers.
//!
//! PDF goes through `pdf-extract`, DOCX through `zip` + `quick-xml`. Both are
//! blocking and `pdf-extract` may panic on hostile input, so the async entry
//! point runs them under `spawn_blocking`.
//!
//! A container that cannot be parsed yields an empty string and a warning; the
//! resume then simply scores low. A missing file or an unknown extension is an
//! error.

mod docx;
mod pdf;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("resume file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),
}

/// Why a supported container could not be read. Absorbed, never surfaced.
#[derive(Debug, Error)]
pub(crate) enum ContainerError {
    #[error("PDF parse error: {0}")]
    Pdf(String),

    #[error("DOCX archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("DOCX XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("DOCX read error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Detected from the file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

/// Extracts raw text from a stored resume.
pub async fn extract_text(path: &Path) -> Result<String, ExtractionError> {
    let owned = path.to_path_buf();
    match tokio::task::spawn_blocking(move || extract_text_blocking(&owned)).await {
        Ok(result) => result,
        Err(e) => {
            warn!(
                "Text extraction task failed for {}: {e}; treating as empty",
                path.display()
            );
            Ok(String::new())
        }
    }
}

/// Synchronous core of [`extract_text`]. May panic inside `pdf-extract`.
pub fn extract_text_blocking(path: &Path) -> Result<String, ExtractionError> {
    let format = DocumentFormat::from_path(path).ok_or_else(|| {
        ExtractionError::UnsupportedFormat(
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or("<none>")
                .to_string(),
        )
    })?;

    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ExtractionError::NotFound(path.to_path_buf())
        } else {
            ExtractionError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let parsed = match format {
        DocumentFormat::Pdf => pdf::extract(&bytes),
        DocumentFormat::Docx => docx::extract(&bytes),
    };

    match parsed {
        Ok(text) => {
            debug!("Extracted {} chars from {}", text.len(), path.display());
            Ok(text)
        }
        Err(e) => {
            warn!("Could not parse {}: {e}; treating as empty", path.display());
            Ok(String::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_format_detection() {
        assert_eq!(DocumentFormat::from_path(Path::new("a/cv.PDF")), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_path(Path::new("cv.docx")), Some(DocumentFormat::Docx));
        assert_eq!(DocumentFormat::from_path(Path::new("cv.doc")), None);
        assert_eq!(DocumentFormat::from_path(Path::new("cv")), None);
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = extract_text(&dir.path().join("nope.pdf")).await.unwrap_err();
        assert!(matches!(err, ExtractionError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_unsupported_extension_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.txt");
        std::fs::write(&path, "plain text").unwrap();
        let err = extract_text(&path).await.unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedFormat(ext) if ext == "txt"));
    }

    #[tokio::test]
    async fn test_corrupt_containers_yield_empty_text() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["broken.pdf", "broken.docx"] {
            let path = dir.path().join(name);
            let mut file = std::fs::File::create(&path).unwrap();
            file.write_all(b"definitely not a document").unwrap();
            assert_eq!(extract_text(&path).await.unwrap(), "", "{name}");
        }
    }

    #[tokio::test]
    async fn test_docx_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.docx");
        std::fs::write(&path, docx::tests::build_docx(&["Jane Doe", "Rust engineer"])).unwrap();
        let text = extract_text(&path).await.unwrap();
        assert_eq!(text.trim(), "Jane Doe\nRust engineer");
    }
}
