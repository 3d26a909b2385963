//! docsift - section search over a Markdown documentation corpus
//!
//! This library splits a single large Markdown document into titled sections,
//! classifies each one, and ranks them against free-text queries. The corpus
//! is fetched through an injected source and kept in an injected cache.

pub mod cache;
pub mod classify;
pub mod cli;
pub mod config;
pub mod extract;
pub mod search;
pub mod session;
pub mod source;
pub mod tui;

/// Re-export commonly used types
pub use cache::{DocCache, FileCache, MemoryCache};
pub use classify::{classify, Category};
pub use config::AppConfig;
pub use extract::{build_sections, Section, SegmenterConfig};
pub use search::{rank, Hit, RankStrategy, SearchFilter};
pub use session::{LoadReport, Provenance, SearchSession, SessionOptions};
pub use source::{DocumentSource, FileSource, HttpSource};

/// Application-wide error type
pub use anyhow::Result;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "docsift";
