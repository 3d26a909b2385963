//! Document segmentation module
//!
//! This module turns one large Markdown corpus into searchable units:
//! - Splitting the text into titled sections at heading boundaries
//! - Deriving keywords and a URL anchor from each title
//! - Attaching the semantic category chosen by the classifier

pub mod doc;
pub mod keywords;

pub use doc::{code_blocks, normalize_callouts, segment, CodeBlock, RawSection, SegmenterConfig};
pub use keywords::extract_keywords;

use crate::classify::{classify, Category};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Compute a stable hash for content
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// A titled, contiguous span of the corpus treated as one search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Heading text without the `#` markers
    pub title: String,
    /// Raw Markdown between this heading and the next boundary, trimmed
    pub body: String,
    /// Heading depth (1 for `#`)
    pub level: u8,
    /// 1-based line of the heading in the source document
    pub line: usize,
    /// URL-safe slug derived from the title
    pub anchor: String,
    /// Lowercase title tokens, first occurrence order
    pub keywords: Vec<String>,
    /// Semantic category assigned from title and body
    pub category: Category,
}

impl Section {
    /// Classify and index a raw section
    pub fn from_raw(raw: RawSection) -> Self {
        let category = classify(&raw.title, &raw.body);
        let keywords = extract_keywords(&raw.title);
        let anchor = slugify(&raw.title);

        Self {
            title: raw.title,
            body: raw.body,
            level: raw.level,
            line: raw.line,
            anchor,
            keywords,
            category,
        }
    }

    /// External documentation link for this section
    pub fn doc_url(&self, base: &str) -> String {
        format!("{}#{}", base.trim_end_matches('/'), self.anchor)
    }

    /// First non-empty body line, used as a one-line preview
    pub fn summary(&self) -> &str {
        self.body
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or("")
    }
}

/// Build the full section list for a document
///
/// Callout markers are normalized once, then the text is segmented and every
/// section is classified. The result is in document order.
pub fn build_sections(text: &str, config: &SegmenterConfig) -> Vec<Section> {
    let normalized = normalize_callouts(text);
    let sections: Vec<Section> = segment(&normalized, config)
        .into_iter()
        .map(Section::from_raw)
        .collect();

    tracing::debug!(
        sections = sections.len(),
        bytes = text.len(),
        max_depth = config.max_depth,
        "Indexed document"
    );

    sections
}

/// Derive a URL-safe slug from a title
///
/// Lowercases the title, collapses every run of non-alphanumeric characters
/// into a single `-`, and strips separators from both ends.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_sep = false;

    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            slug.push(c);
        } else {
            pending_sep = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  $state.raw  "), "state-raw");
        assert_eq!(slugify("<svelte:window>"), "svelte-window");
        assert_eq!(slugify("What's new?"), "what-s-new");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_concrete_scenario() {
        let config = SegmenterConfig::depth_one();
        let sections = build_sections(
            "# Foo\nHello world\n\n# Bar\nuse:clickOutside directive here",
            &config,
        );

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Foo");
        assert_eq!(sections[0].body, "Hello world");
        assert_eq!(sections[1].title, "Bar");
        assert_eq!(sections[1].body, "use:clickOutside directive here");
        assert_eq!(sections[1].category, Category::Directive);
    }

    #[test]
    fn test_section_fields() {
        let sections = build_sections(
            "intro text\n## $app/stores\nimport { page } from '$app/stores';\n",
            &SegmenterConfig::default(),
        );

        assert_eq!(sections.len(), 1);
        let section = &sections[0];
        assert_eq!(section.level, 2);
        assert_eq!(section.line, 2);
        assert_eq!(section.anchor, "app-stores");
        assert_eq!(section.keywords, vec!["app", "stores"]);
        assert_eq!(section.category, Category::Module);
        assert_eq!(
            section.doc_url("https://svelte.dev/docs/"),
            "https://svelte.dev/docs#app-stores"
        );
    }

    #[test]
    fn test_summary_skips_blank_lines() {
        let sections = build_sections("# Title\n\n\n  first line  \nsecond", &SegmenterConfig::default());
        assert_eq!(sections[0].summary(), "first line");
    }

    #[test]
    fn test_callouts_normalized_before_segmenting() {
        let sections = build_sections("# Notes\n> [!NOTE] read this", &SegmenterConfig::default());
        assert_eq!(sections[0].body, "> ℹ read this");
    }

    #[test]
    fn test_content_hash_is_stable() {
        assert_eq!(content_hash("abc"), content_hash("abc"));
        assert_ne!(content_hash("abc"), content_hash("abd"));
        assert_eq!(content_hash("").len(), 64);
    }
}
