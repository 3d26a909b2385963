//! Search session: load, cache, index and query one corpus
//!
//! The cache and the source are injected at construction. Loading is
//! read-through (a fresh cached copy is used as-is) and write-through (a
//! successful fetch is stored). Every load rebuilds the section list from
//! scratch.

use crate::cache::{CachedDoc, DocCache};
use crate::extract::{build_sections, Section, SegmenterConfig};
use crate::search::{rank, Hit, RankStrategy, SearchFilter};
use crate::source::DocumentSource;
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};

/// Cache entry name for the corpus
pub const CACHE_ENTRY: &str = "corpus";

/// Where the currently indexed text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// A cached copy within its time-to-live
    Cached,
    /// Freshly fetched from the source
    Fetched,
    /// An expired cached copy, used because the fetch failed
    Stale,
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provenance::Cached => write!(f, "cached"),
            Provenance::Fetched => write!(f, "fetched"),
            Provenance::Stale => write!(f, "stale cache"),
        }
    }
}

/// Outcome of a load or refresh
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub provenance: Provenance,
    /// Number of sections indexed
    pub sections: usize,
    /// When the indexed text was fetched
    pub fetched_at: DateTime<Utc>,
    /// Description of the source
    pub origin: String,
    /// Why a fetch failed, when the stale cache was used instead
    pub warning: Option<String>,
}

/// Session tuning
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub segmenter: SegmenterConfig,
    pub strategy: RankStrategy,
    /// How long a cached copy may be reused
    pub ttl: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            segmenter: SegmenterConfig::default(),
            strategy: RankStrategy::default(),
            ttl: Duration::hours(1),
        }
    }
}

/// An indexed corpus plus the collaborators that produced it
pub struct SearchSession {
    cache: Box<dyn DocCache>,
    source: Box<dyn DocumentSource>,
    options: SessionOptions,
    sections: Vec<Section>,
    last_load: Option<LoadReport>,
}

impl SearchSession {
    /// Create an empty session; call [`SearchSession::load`] before searching
    pub fn new(
        cache: Box<dyn DocCache>,
        source: Box<dyn DocumentSource>,
        options: SessionOptions,
    ) -> Self {
        Self {
            cache,
            source,
            options,
            sections: Vec::new(),
            last_load: None,
        }
    }

    /// Load the corpus, preferring a fresh cached copy
    pub async fn load(&mut self) -> Result<LoadReport> {
        let cached = match self.cache.get(CACHE_ENTRY) {
            Ok(cached) => cached,
            Err(e) => {
                tracing::warn!("Cache read failed, fetching instead: {}", e);
                None
            }
        };

        if let Some(doc) = cached.as_ref() {
            let now = Utc::now();
            if doc.is_fresh(self.options.ttl, now) {
                tracing::info!(
                    age_minutes = doc.age(now).num_minutes(),
                    "Using cached document"
                );
                let fetched_at = doc.fetched_at;
                return Ok(self.index(&doc.text, Provenance::Cached, fetched_at, None));
            }
            tracing::debug!("Cached document expired");
        }

        self.fetch_and_index(cached).await
    }

    /// Fetch again, ignoring any cached copy
    ///
    /// The cached copy is only replaced by a successful fetch. On failure the
    /// previously indexed sections and the cache entry are both kept.
    pub async fn refresh(&mut self) -> Result<LoadReport> {
        self.fetch_and_index(None).await
    }

    /// Delete the cached copy without fetching
    pub fn purge_cache(&self) -> Result<()> {
        self.cache.clear(CACHE_ENTRY)
    }

    async fn fetch_and_index(&mut self, stale: Option<CachedDoc>) -> Result<LoadReport> {
        match self.source.fetch().await {
            Ok(text) => {
                if let Err(e) = self.cache.set(CACHE_ENTRY, &text) {
                    tracing::warn!("Failed to cache document: {}", e);
                }
                Ok(self.index(&text, Provenance::Fetched, Utc::now(), None))
            }
            Err(e) => match stale {
                Some(doc) => {
                    tracing::warn!("Fetch failed, using stale cache: {:#}", e);
                    let fetched_at = doc.fetched_at;
                    Ok(self.index(&doc.text, Provenance::Stale, fetched_at, Some(format!("{:#}", e))))
                }
                None => Err(e.context(format!("Failed to load {}", self.source.describe()))),
            },
        }
    }

    fn index(
        &mut self,
        text: &str,
        provenance: Provenance,
        fetched_at: DateTime<Utc>,
        warning: Option<String>,
    ) -> LoadReport {
        self.sections = build_sections(text, &self.options.segmenter);

        let report = LoadReport {
            provenance,
            sections: self.sections.len(),
            fetched_at,
            origin: self.source.describe(),
            warning,
        };
        tracing::info!(
            sections = report.sections,
            provenance = %report.provenance,
            "Loaded {}",
            report.origin
        );

        self.last_load = Some(report.clone());
        report
    }

    /// Indexed sections in document order
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Report of the most recent successful load
    pub fn last_load(&self) -> Option<&LoadReport> {
        self.last_load.as_ref()
    }

    /// Current ranking strategy
    pub fn strategy(&self) -> RankStrategy {
        self.options.strategy
    }

    pub fn set_strategy(&mut self, strategy: RankStrategy) {
        self.options.strategy = strategy;
    }

    /// Rank all sections against a query
    pub fn search(&self, query: &str) -> Vec<Hit> {
        rank(&self.sections, query, self.options.strategy)
    }

    /// Rank, then narrow by category and limit
    pub fn search_filtered(&self, query: &str, filter: &SearchFilter) -> Vec<Hit> {
        filter.apply(&self.sections, self.search(query))
    }

    /// Section referenced by a hit
    pub fn section(&self, hit: &Hit) -> Option<&Section> {
        self.sections.get(hit.index)
    }

    /// Find a section by title: exact (case-insensitive) first, else best hit
    pub fn find(&self, title: &str) -> Option<&Section> {
        let wanted = title.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }

        self.sections
            .iter()
            .find(|s| s.title.to_lowercase() == wanted)
            .or_else(|| {
                rank(&self.sections, &wanted, RankStrategy::Substring)
                    .first()
                    .and_then(|hit| self.sections.get(hit.index))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const DOC: &str = "# Foo\nHello world\n\n# Bar\nuse:clickOutside directive here\n";

    /// Source that counts calls and can be switched to fail
    struct StubSource {
        text: String,
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl DocumentSource for StubSource {
        async fn fetch(&self) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("network unreachable");
            }
            Ok(self.text.clone())
        }

        fn describe(&self) -> String {
            "stub".to_string()
        }
    }

    fn session(cache: Arc<MemoryCache>, fail: bool) -> (SearchSession, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = StubSource {
            text: DOC.to_string(),
            calls: calls.clone(),
            fail,
        };
        let session = SearchSession::new(
            Box::new(cache),
            Box::new(source),
            SessionOptions::default(),
        );
        (session, calls)
    }

    #[tokio::test]
    async fn test_fetch_then_cache() {
        let cache = Arc::new(MemoryCache::new());

        let (mut first, calls) = session(cache.clone(), false);
        let report = first.load().await.unwrap();
        assert_eq!(report.provenance, Provenance::Fetched);
        assert_eq!(report.sections, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.get(CACHE_ENTRY).unwrap().unwrap().text, DOC);

        let (mut second, calls) = session(cache.clone(), false);
        let report = second.load().await.unwrap();
        assert_eq!(report.provenance, Provenance::Cached);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(second.sections(), first.sections());
    }

    #[tokio::test]
    async fn test_expired_cache_refetches() {
        let cache = Arc::new(MemoryCache::new());
        cache.insert(
            CACHE_ENTRY,
            CachedDoc {
                text: "# Old\nold body".to_string(),
                fetched_at: Utc::now() - Duration::hours(2),
            },
        );

        let (mut session, calls) = session(cache, false);
        let report = session.load().await.unwrap();
        assert_eq!(report.provenance, Provenance::Fetched);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.sections()[0].title, "Foo");
    }

    #[tokio::test]
    async fn test_stale_cache_on_fetch_failure() {
        let cache = Arc::new(MemoryCache::new());
        cache.insert(
            CACHE_ENTRY,
            CachedDoc {
                text: "# Old\nold body".to_string(),
                fetched_at: Utc::now() - Duration::hours(2),
            },
        );

        let (mut session, _) = session(cache, true);
        let report = session.load().await.unwrap();
        assert_eq!(report.provenance, Provenance::Stale);
        assert!(report.warning.unwrap().contains("network unreachable"));
        assert_eq!(session.sections()[0].title, "Old");
    }

    #[tokio::test]
    async fn test_fetch_failure_without_cache_is_error() {
        let (mut session, _) = session(Arc::new(MemoryCache::new()), true);
        assert!(session.load().await.is_err());
        assert!(session.sections().is_empty());
        assert!(session.last_load().is_none());
    }

    #[tokio::test]
    async fn test_refresh_bypasses_fresh_cache() {
        let cache = Arc::new(MemoryCache::new());
        cache.set(CACHE_ENTRY, "# Cached\ncached body").unwrap();

        let (mut session, calls) = session(cache, false);
        assert_eq!(session.load().await.unwrap().provenance, Provenance::Cached);
        assert_eq!(session.sections()[0].title, "Cached");

        let report = session.refresh().await.unwrap();
        assert_eq!(report.provenance, Provenance::Fetched);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.sections()[0].title, "Foo");
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_sections() {
        let cache = Arc::new(MemoryCache::new());
        cache.set(CACHE_ENTRY, DOC).unwrap();

        let (mut session, _) = session(cache, true);
        session.load().await.unwrap();
        assert!(session.refresh().await.is_err());
        assert_eq!(session.sections().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_cache_entry() {
        let cache = Arc::new(MemoryCache::new());
        cache.insert(
            CACHE_ENTRY,
            CachedDoc {
                text: "# Old\nold body".to_string(),
                fetched_at: Utc::now() - Duration::hours(2),
            },
        );

        let (mut offline, _) = session(cache.clone(), true);
        assert!(offline.refresh().await.is_err());
        assert!(cache.get(CACHE_ENTRY).unwrap().is_some());

        let (mut next, _) = session(cache, true);
        let report = next.load().await.unwrap();
        assert_eq!(report.provenance, Provenance::Stale);
        assert_eq!(next.sections()[0].title, "Old");
    }

    #[tokio::test]
    async fn test_refresh_overwrites_cache_entry() {
        let cache = Arc::new(MemoryCache::new());
        cache.set(CACHE_ENTRY, "# Cached\ncached body").unwrap();

        let (mut session, _) = session(cache.clone(), false);
        session.refresh().await.unwrap();
        assert_eq!(cache.get(CACHE_ENTRY).unwrap().unwrap().text, DOC);

        session.purge_cache().unwrap();
        assert!(cache.get(CACHE_ENTRY).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_and_find() {
        let (mut session, _) = session(Arc::new(MemoryCache::new()), false);
        session.load().await.unwrap();

        let hits = session.search("foo");
        assert_eq!(session.section(&hits[0]).unwrap().title, "Foo");
        assert_eq!(session.search("").len(), 2);
        assert!(session.search("nothing-here").is_empty());

        assert_eq!(session.find("bar").unwrap().title, "Bar");
        assert_eq!(session.find("clickoutside").unwrap().title, "Bar");
        assert!(session.find("  ").is_none());

        session.set_strategy(RankStrategy::fuzzy());
        assert_eq!(session.strategy().name(), "fuzzy");
        assert_eq!(session.section(&session.search("foo")[0]).unwrap().title, "Foo");
    }
}
