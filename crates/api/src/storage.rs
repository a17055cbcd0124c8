//! Document storage abstraction for uploaded project and milestone files.
//!
//! Handlers validate uploads with `sigep_core::document` first, then hand the
//! bytes to a [`DocumentStore`]. The local filesystem implementation is the
//! only backend; the trait keeps handlers testable with a temp directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

/// Backing store for uploaded documents.
///
/// Paths returned by [`store`](DocumentStore::store) are relative to the
/// store root and are what gets persisted in `file_path` columns.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persist `bytes` under a collision-free name derived from `filename`.
    ///
    /// Returns the relative path to record in the database.
    async fn store(&self, filename: &str, bytes: &[u8]) -> Result<String, std::io::Error>;

    /// Remove a previously stored document.
    ///
    /// Removing a path that no longer exists is not an error; hard-delete
    /// file cleanup is best-effort.
    async fn remove(&self, path: &str) -> Result<(), std::io::Error>;
}

/// Filesystem-backed document store rooted at a configured directory.
pub struct LocalDocumentStore {
    root: PathBuf,
}

impl LocalDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl DocumentStore for LocalDocumentStore {
    async fn store(&self, filename: &str, bytes: &[u8]) -> Result<String, std::io::Error> {
        let relative = storage_name(filename);
        let full = self.root.join(&relative);
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&full, bytes).await?;
        tracing::debug!(path = %relative, size = bytes.len(), "document stored");
        Ok(relative)
    }

    async fn remove(&self, path: &str) -> Result<(), std::io::Error> {
        let full = self.root.join(path);
        match tokio::fs::remove_file(&full).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// Derive a unique, path-safe storage name from an uploaded filename.
///
/// The original stem is kept (sanitized) for operator legibility; a UUID
/// suffix prevents collisions between uploads sharing a name.
fn storage_name(filename: &str) -> String {
    let path = Path::new(filename);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("bin")
        .to_ascii_lowercase();

    let safe_stem: String = stem
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .take(64)
        .collect();

    format!("{safe_stem}_{}.{extension}", Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_name_keeps_stem_and_extension() {
        let name = storage_name("Momento I.pdf");
        assert!(name.starts_with("Momento_I_"));
        assert!(name.ends_with(".pdf"));
    }

    #[test]
    fn test_storage_name_strips_directories() {
        let name = storage_name("../../etc/passwd.docx");
        assert!(!name.contains('/'));
        assert!(name.ends_with(".docx"));
    }

    #[test]
    fn test_storage_names_are_unique() {
        assert_ne!(storage_name("tesis.pdf"), storage_name("tesis.pdf"));
    }
}
