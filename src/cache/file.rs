//! On-disk cache under the user cache directory

use super::{CachedDoc, DocCache};
use crate::extract::content_hash;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Metadata stored next to each cached blob
#[derive(Debug, Serialize, Deserialize)]
struct CacheMeta {
    fetched_at: DateTime<Utc>,
    sha256: String,
    bytes: usize,
}

/// Cache storing `<name>.md` plus `<name>.json` metadata in one directory
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Create a cache rooted at `dir` (created lazily on first write)
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Cache in the platform cache directory, e.g. `~/.cache/docsift`
    pub fn in_user_cache_dir() -> Result<Self> {
        let base = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine the user cache directory"))?;
        Ok(Self::new(base.join(crate::APP_NAME)))
    }

    /// Directory holding the cache files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn paths(&self, name: &str) -> Result<(PathBuf, PathBuf)> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            anyhow::bail!("Invalid cache entry name: {:?}", name);
        }

        Ok((
            self.dir.join(format!("{}.md", name)),
            self.dir.join(format!("{}.json", name)),
        ))
    }
}

impl DocCache for FileCache {
    fn get(&self, name: &str) -> Result<Option<CachedDoc>> {
        let (text_path, meta_path) = self.paths(name)?;

        if !text_path.exists() || !meta_path.exists() {
            return Ok(None);
        }

        let meta_raw = std::fs::read_to_string(&meta_path)
            .with_context(|| format!("Failed to read cache metadata: {:?}", meta_path))?;
        let meta: CacheMeta = match serde_json::from_str(&meta_raw) {
            Ok(meta) => meta,
            Err(e) => {
                tracing::warn!("Ignoring unreadable cache metadata {:?}: {}", meta_path, e);
                return Ok(None);
            }
        };

        let text = std::fs::read_to_string(&text_path)
            .with_context(|| format!("Failed to read cached document: {:?}", text_path))?;

        if content_hash(&text) != meta.sha256 {
            tracing::warn!("Cached document {:?} failed its checksum; treating as missing", text_path);
            return Ok(None);
        }

        Ok(Some(CachedDoc {
            text,
            fetched_at: meta.fetched_at,
        }))
    }

    fn set(&self, name: &str, text: &str) -> Result<()> {
        let (text_path, meta_path) = self.paths(name)?;

        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create cache directory: {:?}", self.dir))?;

        std::fs::write(&text_path, text)
            .with_context(|| format!("Failed to write cached document: {:?}", text_path))?;

        let meta = CacheMeta {
            fetched_at: Utc::now(),
            sha256: content_hash(text),
            bytes: text.len(),
        };
        let content =
            serde_json::to_string_pretty(&meta).context("Failed to serialize cache metadata")?;
        std::fs::write(&meta_path, content)
            .with_context(|| format!("Failed to write cache metadata: {:?}", meta_path))?;

        tracing::debug!(bytes = meta.bytes, "Cached document at {:?}", text_path);
        Ok(())
    }

    fn clear(&self, name: &str) -> Result<()> {
        let (text_path, meta_path) = self.paths(name)?;

        for path in [text_path, meta_path] {
            if path.exists() {
                std::fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove cache file: {:?}", path))?;
            }
        }

        Ok(())
    }
}
