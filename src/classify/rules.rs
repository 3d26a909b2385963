//! Ordered classification rules
//!
//! The chain is evaluated top to bottom and the first match wins. Broad topic
//! rules sit below the syntax rules they would otherwise shadow: a body that
//! mentions both `$state(` and `style` must stay a rune.

use super::Category;
use regex::Regex;
use std::sync::LazyLock;

/// Rune sigils followed by a known rune name
static RUNE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(state|derived|effect|props|bindable|inspect|host)\b")
        .expect("rune pattern is valid")
});

/// A bare `name:` title such as `bind:`, or a directive with its argument
static DIRECTIVE_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|[^a-z0-9_$:-])(use|bind|on|transition|in|out|animate|class|style|attach):([a-z_]|$)")
        .expect("directive title pattern is valid")
});

/// In running text a directive must carry its argument, so `depends on:` is prose
static DIRECTIVE_BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(^|[^a-z0-9_$:-])(use|bind|on|transition|in|out|animate|class|style|attach):[a-z_]")
        .expect("directive body pattern is valid")
});

/// Call-signature titles such as `mount(component, options)` or `flushSync()`
static CALL_SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_$][\w$.]*\(.*\)$").expect("signature pattern is valid")
});

const BLOCK_MARKERS: &[&str] = &[
    "{#if", "{#each", "{#await", "{#key", "{#snippet", "{@render", "{@html", "{@const",
    "{@debug", "{@attach",
];

const MODULE_PREFIXES: &[&str] = &["svelte/", "$app/", "$env/", "$lib", "$service-worker", "@sveltejs/"];

/// Lowercased view of a section handed to every rule
pub struct Subject<'a> {
    /// Title as written
    pub title: &'a str,
    pub title_lc: String,
    pub body_lc: String,
}

impl<'a> Subject<'a> {
    pub fn new(title: &'a str, body: &str) -> Self {
        Self {
            title: title.trim(),
            title_lc: title.trim().to_lowercase(),
            body_lc: body.to_lowercase(),
        }
    }

    /// Title or body contains any of the needles
    fn mentions(&self, needles: &[&str]) -> bool {
        needles
            .iter()
            .any(|n| self.title_lc.contains(n) || self.body_lc.contains(n))
    }

    fn title_mentions(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.title_lc.contains(n))
    }

    fn body_mentions(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.body_lc.contains(n))
    }

    fn matches(&self, re: &Regex) -> bool {
        re.is_match(&self.title_lc) || re.is_match(&self.body_lc)
    }
}

/// One link in the classification chain
pub struct Rule {
    /// Stable rule name, reported by `--explain`
    pub name: &'static str,
    pub category: Category,
    pub matches: fn(&Subject<'_>) -> bool,
}

/// The classification chain, most specific first
pub static RULES: &[Rule] = &[
    Rule {
        name: "rune",
        category: Category::Rune,
        matches: |s| s.matches(&RUNE),
    },
    Rule {
        name: "directive",
        category: Category::Directive,
        matches: |s| DIRECTIVE_TITLE.is_match(&s.title_lc) || DIRECTIVE_BODY.is_match(&s.body_lc),
    },
    Rule {
        name: "block",
        category: Category::Block,
        matches: |s| s.mentions(BLOCK_MARKERS),
    },
    Rule {
        name: "element",
        category: Category::Element,
        matches: |s| s.mentions(&["<svelte:"]) || s.title_lc.starts_with("svelte:"),
    },
    Rule {
        name: "module",
        category: Category::Module,
        matches: |s| {
            let title = s.title_lc.trim_matches('`');
            MODULE_PREFIXES.iter().any(|p| title.starts_with(p)) || title == "svelte"
        },
    },
    Rule {
        name: "api",
        category: Category::Api,
        matches: |s| {
            CALL_SIGNATURE.is_match(s.title.trim_matches('`')) || s.body_mentions(&["```dts"])
        },
    },
    Rule {
        name: "config",
        category: Category::Config,
        matches: |s| {
            s.title_mentions(&["config"]) || s.body_mentions(&["svelte.config", "vite.config"])
        },
    },
    Rule {
        name: "migration",
        category: Category::Migration,
        matches: |s| {
            s.title_mentions(&["migrat", "upgrad", "breaking change"])
                || s.body_mentions(&["migration guide", "sv migrate"])
        },
    },
    Rule {
        name: "error",
        category: Category::Error,
        matches: |s| {
            s.title_mentions(&["error", "warning"])
                || s.body_mentions(&[
                    "compiler error",
                    "runtime error",
                    "compiler warning",
                    "runtime warning",
                ])
        },
    },
    Rule {
        name: "styling",
        category: Category::Styling,
        matches: |s| s.mentions(&["style", "css"]),
    },
    Rule {
        name: "testing",
        category: Category::Testing,
        matches: |s| {
            s.title_mentions(&["test"])
                || s.body_mentions(&["vitest", "playwright", "@testing-library"])
        },
    },
    Rule {
        name: "typescript",
        category: Category::Typescript,
        matches: |s| s.mentions(&["typescript", "lang=\"ts\""]),
    },
    Rule {
        name: "stores",
        category: Category::Stores,
        matches: |s| {
            s.title_mentions(&["store"])
                || s.body_mentions(&["writable(", "readable(", "svelte/store"])
        },
    },
    Rule {
        name: "context",
        category: Category::Context,
        matches: |s| {
            s.title_mentions(&["context"])
                || s.body_mentions(&["setcontext", "getcontext", "hascontext", "getallcontexts"])
        },
    },
    Rule {
        name: "lifecycle",
        category: Category::Lifecycle,
        matches: |s| {
            s.title_mentions(&["lifecycle"])
                || s.mentions(&["onmount", "ondestroy", "beforeupdate", "afterupdate", "tick("])
        },
    },
    Rule {
        name: "legacy",
        category: Category::Legacy,
        matches: |s| s.mentions(&["legacy", "deprecated", "export let", "$:"]),
    },
];
