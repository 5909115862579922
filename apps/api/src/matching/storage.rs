use std::io;
use std::path::{Path, PathBuf};

use tracing::info;
use uuid::Uuid;

/// Uploaded resumes on local disk. Files are stored under a fresh UUID name
/// with the original extension; the database keeps the path.
#[derive(Debug, Clone)]
pub struct ResumeStorage {
    root: PathBuf,
}

impl ResumeStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn init(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        info!("Resume storage ready at {}", self.root.display());
        Ok(())
    }

    /// Writes `bytes` and returns the stored path.
    pub async fn save(&self, original_filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let name = match extension_of(original_filename) {
            Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
            None => Uuid::new_v4().to_string(),
        };
        let path = self.root.join(name);
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }

    pub async fn read(&self, stored: &Path) -> io::Result<Vec<u8>> {
        tokio::fs::read(stored).await
    }
}

/// Final path component of a client-supplied name, without directories.
pub fn sanitize_filename(name: &str) -> String {
    name.rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| e.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let storage = ResumeStorage::new(dir.path().join("resumes"));
        storage.init().await.unwrap();

        let path = storage.save("Jane CV.PDF", b"%PDF-1.4 fake").await.unwrap();
        assert!(path.starts_with(storage.root()));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("pdf"));
        assert_eq!(storage.read(&path).await.unwrap(), b"%PDF-1.4 fake");
    }

    #[tokio::test]
    async fn test_same_name_never_collides() {
        let dir = tempfile::tempdir().unwrap();
        let storage = ResumeStorage::new(dir.path());
        let a = storage.save("cv.docx", b"a").await.unwrap();
        let b = storage.save("cv.docx", b"b").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_read_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let storage = ResumeStorage::new(dir.path());
        let err = storage.read(&dir.path().join("gone.pdf")).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_sanitize_filename_strips_directories() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\Users\\me\\cv.pdf"), "cv.pdf");
        assert_eq!(sanitize_filename(" cv.docx "), "cv.docx");
    }
}
