//! Section classification
//!
//! Every section gets exactly one [`Category`], chosen by the first matching
//! rule of an ordered chain. Rules run from most specific (rune sigils,
//! directives) to most generic (topic words), and anything left over is a
//! [`Category::Concept`].

mod rules;

pub use rules::{Rule, Subject, RULES};

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Semantic label of a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// `$state`, `$derived`, `$effect` and friends
    Rune,
    /// `use:`, `bind:`, `transition:` style attributes
    Directive,
    /// Template logic blocks such as `{#if}` and `{@render}`
    Block,
    /// Special `<svelte:*>` elements
    Element,
    /// Importable modules (`svelte/store`, `$app/stores`)
    Module,
    /// Function and type reference entries
    Api,
    Concept,
    Config,
    Migration,
    Error,
    Styling,
    Testing,
    Typescript,
    Stores,
    Context,
    Lifecycle,
    /// Deprecated or legacy-mode syntax
    Legacy,
}

impl Category {
    /// All categories in declaration order
    pub const ALL: [Category; 17] = [
        Category::Rune,
        Category::Directive,
        Category::Block,
        Category::Element,
        Category::Module,
        Category::Api,
        Category::Concept,
        Category::Config,
        Category::Migration,
        Category::Error,
        Category::Styling,
        Category::Testing,
        Category::Typescript,
        Category::Stores,
        Category::Context,
        Category::Lifecycle,
        Category::Legacy,
    ];

    /// Lowercase name, also used as a low-weight search field
    pub fn label(self) -> &'static str {
        match self {
            Category::Rune => "rune",
            Category::Directive => "directive",
            Category::Block => "block",
            Category::Element => "element",
            Category::Module => "module",
            Category::Api => "api",
            Category::Concept => "concept",
            Category::Config => "config",
            Category::Migration => "migration",
            Category::Error => "error",
            Category::Styling => "styling",
            Category::Testing => "testing",
            Category::Typescript => "typescript",
            Category::Stores => "stores",
            Category::Context => "context",
            Category::Lifecycle => "lifecycle",
            Category::Legacy => "legacy",
        }
    }

    /// Display glyph
    pub fn icon(self) -> &'static str {
        match self {
            Category::Rune => "✨",
            Category::Directive => "🔗",
            Category::Block => "🧱",
            Category::Element => "🏷",
            Category::Module => "📦",
            Category::Api => "🔧",
            Category::Concept => "💡",
            Category::Config => "⚙",
            Category::Migration => "🚚",
            Category::Error => "🚨",
            Category::Styling => "🎨",
            Category::Testing => "🧪",
            Category::Typescript => "🔷",
            Category::Stores => "🗄",
            Category::Context => "🧭",
            Category::Lifecycle => "🔄",
            Category::Legacy => "🕰",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.label() == wanted)
            .ok_or_else(|| anyhow::anyhow!("Unknown category: {}", s))
    }
}

/// Classify a section from its title and body
pub fn classify(title: &str, body: &str) -> Category {
    classify_with_rule(title, body).0
}

/// Classify a section and report which rule decided it
///
/// The rule name is `None` when nothing matched and the section fell back to
/// [`Category::Concept`].
pub fn classify_with_rule(title: &str, body: &str) -> (Category, Option<&'static str>) {
    let subject = Subject::new(title, body);

    RULES
        .iter()
        .find(|rule| (rule.matches)(&subject))
        .map(|rule| (rule.category, Some(rule.name)))
        .unwrap_or((Category::Concept, None))
}
