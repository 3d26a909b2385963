//! Deterministic substring scoring

use crate::extract::Section;

const KEYWORD_EXACT: u32 = 100;
const KEYWORD_CONTAINS: u32 = 50;
const TITLE_EXACT: u32 = 30;
const TITLE_CONTAINS: u32 = 20;
const BODY_CONTAINS: u32 = 10;

/// Score a section against a lowercase, non-empty query
///
/// Returns `None` unless the query occurs in the title, a keyword, or the
/// body. Points are additive: an exact keyword match also counts as a
/// keyword containing the query, and so on.
pub fn substring_score(section: &Section, query: &str) -> Option<f64> {
    let title = section.title.to_lowercase();
    let body = section.body.to_lowercase();

    let keyword_exact = section.keywords.iter().any(|k| k == query);
    let keyword_contains = section.keywords.iter().any(|k| k.contains(query));
    let title_contains = title.contains(query);
    let body_contains = body.contains(query);

    if !(keyword_contains || title_contains || body_contains) {
        return None;
    }

    let mut score = 0;
    if keyword_exact {
        score += KEYWORD_EXACT;
    }
    if keyword_contains {
        score += KEYWORD_CONTAINS;
    }
    if title == query {
        score += TITLE_EXACT;
    }
    if title_contains {
        score += TITLE_CONTAINS;
    }
    if body_contains {
        score += BODY_CONTAINS;
    }

    Some(f64::from(score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{RawSection, Section};

    fn section(title: &str, body: &str) -> Section {
        Section::from_raw(RawSection {
            title: title.to_string(),
            body: body.to_string(),
            level: 1,
            line: 1,
        })
    }

    #[test]
    fn test_additive_points() {
        // keyword exact + keyword contains + title exact + title contains + body
        let s = section("Snippets", "Snippets are reusable markup.");
        assert_eq!(substring_score(&s, "snippets"), Some(210.0));

        // keyword contains + title contains
        let s = section("Snippets", "Reusable markup.");
        assert_eq!(substring_score(&s, "snip"), Some(70.0));

        // body only
        let s = section("Templates", "Use a snippet here.");
        assert_eq!(substring_score(&s, "snippet"), Some(10.0));
    }

    #[test]
    fn test_title_exact_without_keyword() {
        // "of" is too short to be a keyword, but the title still matches
        let s = section("of", "body");
        assert_eq!(substring_score(&s, "of"), Some(50.0));
    }

    #[test]
    fn test_title_exact_scores_higher() {
        let exact = section("Await", "Waiting on promises.");
        let other = section("Waiting", "Waiting on promises with await.");
        let a = substring_score(&exact, "await").unwrap();
        let b = substring_score(&other, "await").unwrap();
        assert!(a > b);
    }

    #[test]
    fn test_monotonic_in_title_match() {
        let with_title = section("Bindings", "shared body text");
        let without = section("Other", "shared body text");
        // Identical bodies; only the title differs
        let a = substring_score(&with_title, "bindings").unwrap_or(0.0);
        let b = substring_score(&without, "bindings").unwrap_or(0.0);
        assert!(a > b);
    }

    #[test]
    fn test_no_match() {
        let s = section("Foo", "bar");
        assert_eq!(substring_score(&s, "baz"), None);
    }
}
