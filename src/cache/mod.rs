//! Document cache collaborators
//!
//! The search session never owns a global cache. It is handed an object that
//! can get, set and clear one named text blob; expiry is decided by the
//! session from the stored fetch time.

mod file;

pub use file::FileCache;

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

/// A cached copy of the corpus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedDoc {
    /// Full document text
    pub text: String,
    /// When the text was fetched from its source
    pub fetched_at: DateTime<Utc>,
}

impl CachedDoc {
    /// Whether the copy is still usable under the given time-to-live
    pub fn is_fresh(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        ttl > Duration::zero() && now.signed_duration_since(self.fetched_at) < ttl
    }

    /// Age of the copy at `now`
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.fetched_at)
    }
}

/// Storage for named text blobs
pub trait DocCache: Send + Sync {
    /// Read an entry, `None` when absent
    fn get(&self, name: &str) -> Result<Option<CachedDoc>>;

    /// Write an entry stamped with the current time
    fn set(&self, name: &str, text: &str) -> Result<()>;

    /// Remove an entry; removing a missing entry is not an error
    fn clear(&self, name: &str) -> Result<()>;
}

impl<T: DocCache + ?Sized> DocCache for std::sync::Arc<T> {
    fn get(&self, name: &str) -> Result<Option<CachedDoc>> {
        (**self).get(name)
    }

    fn set(&self, name: &str, text: &str) -> Result<()> {
        (**self).set(name, text)
    }

    fn clear(&self, name: &str) -> Result<()> {
        (**self).clear(name)
    }
}

/// In-process cache, used for tests and `--no-cache` runs
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CachedDoc>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entry with an explicit fetch time
    pub fn insert(&self, name: &str, doc: CachedDoc) {
        self.lock().insert(name.to_string(), doc);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, CachedDoc>> {
        // A poisoned map still holds consistent entries
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DocCache for MemoryCache {
    fn get(&self, name: &str) -> Result<Option<CachedDoc>> {
        Ok(self.lock().get(name).cloned())
    }

    fn set(&self, name: &str, text: &str) -> Result<()> {
        self.insert(
            name,
            CachedDoc {
                text: text.to_string(),
                fetched_at: Utc::now(),
            },
        );
        Ok(())
    }

    fn clear(&self, name: &str) -> Result<()> {
        self.lock().remove(name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_cache_roundtrip() {
        let cache = MemoryCache::new();
        assert!(cache.get("docs").unwrap().is_none());

        cache.set("docs", "# A\nbody").unwrap();
        let doc = cache.get("docs").unwrap().unwrap();
        assert_eq!(doc.text, "# A\nbody");

        cache.clear("docs").unwrap();
        assert!(cache.get("docs").unwrap().is_none());
        cache.clear("docs").unwrap();
    }

    #[test]
    fn test_freshness() {
        let now = Utc::now();
        let doc = CachedDoc {
            text: String::new(),
            fetched_at: now - Duration::minutes(30),
        };

        assert!(doc.is_fresh(Duration::minutes(60), now));
        assert!(!doc.is_fresh(Duration::minutes(15), now));
        assert!(!doc.is_fresh(Duration::zero(), now));
        assert_eq!(doc.age(now), Duration::minutes(30));
    }
}
