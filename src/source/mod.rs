//! Where the documentation corpus comes from
//!
//! Sources only produce the raw text; parsing is identical regardless of
//! whether the text was fetched, read from disk, or served from a cache.

mod http;

pub use http::HttpSource;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Failures specific to retrieving the corpus
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    #[error("document from {origin} is empty")]
    Empty { origin: String },
}

/// Trait for corpus providers
#[async_trait::async_trait]
pub trait DocumentSource: Send + Sync {
    /// Retrieve the full document text
    async fn fetch(&self) -> Result<String>;

    /// Human-readable origin for logs and status lines
    fn describe(&self) -> String;
}

/// Reads the corpus from a local Markdown file
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait::async_trait]
impl DocumentSource for FileSource {
    async fn fetch(&self) -> Result<String> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read document: {:?}", self.path))?;

        if text.trim().is_empty() {
            return Err(SourceError::Empty {
                origin: self.describe(),
            }
            .into());
        }

        Ok(text)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_source_reads_text() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("docs.md");
        std::fs::write(&path, "# A\nbody").unwrap();

        let source = FileSource::new(&path);
        assert_eq!(source.fetch().await.unwrap(), "# A\nbody");
        assert!(source.describe().ends_with("docs.md"));
    }

    #[tokio::test]
    async fn test_file_source_rejects_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("empty.md");
        std::fs::write(&path, "  \n").unwrap();

        let err = FileSource::new(&path).fetch().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SourceError>(),
            Some(SourceError::Empty { .. })
        ));
    }

    #[tokio::test]
    async fn test_file_source_missing_file() {
        let tmp = TempDir::new().unwrap();
        let result = FileSource::new(tmp.path().join("missing.md")).fetch().await;
        assert!(result.is_err());
    }
}
