//! Weighted typo-tolerant scoring

use crate::extract::Section;
use rapidfuzz::distance::jaro_winkler;

/// Default minimum best-field similarity
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.75;

/// Tokens shorter than this only match as substrings
const MIN_FUZZY_TOKEN_LEN: usize = 3;

/// Similarity credited to a candidate that starts with the query token
const PREFIX_SIMILARITY: f64 = 0.95;

/// Similarity credited to a candidate that contains the query token
const INFIX_SIMILARITY: f64 = 0.9;

/// Relative weight of each searchable field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldWeights {
    pub keywords: f64,
    pub title: f64,
    pub body: f64,
    pub category: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            keywords: 0.4,
            title: 0.3,
            body: 0.2,
            category: 0.1,
        }
    }
}

/// Score a section against a lowercase, non-empty query
///
/// Each field yields a similarity in `[0, 1]`. The section is kept when its
/// best field reaches `threshold`; the returned score is the weighted sum.
pub fn fuzzy_score(
    section: &Section,
    query: &str,
    weights: &FieldWeights,
    threshold: f64,
) -> Option<f64> {
    let tokens: Vec<&str> = query.split_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }

    let keywords = token_similarity(&tokens, section.keywords.iter().map(String::as_str));

    let title_lc = section.title.to_lowercase();
    let title = if title_lc.contains(query) {
        1.0
    } else {
        token_similarity(&tokens, words(&title_lc))
    };

    let body_lc = section.body.to_lowercase();
    let body = if body_lc.contains(query) {
        1.0
    } else {
        let found = tokens.iter().filter(|t| body_lc.contains(*t)).count();
        found as f64 / tokens.len() as f64 * INFIX_SIMILARITY
    };

    let label = section.category.label();
    let category = if label.contains(query) {
        1.0
    } else {
        token_similarity(&tokens, std::iter::once(label))
    };

    let best = keywords.max(title).max(body).max(category);
    if best < threshold {
        return None;
    }

    Some(
        weights.keywords * keywords
            + weights.title * title
            + weights.body * body
            + weights.category * category,
    )
}

/// Split lowercase text into alphanumeric words
fn words(text: &str) -> impl Iterator<Item = &str> + Clone {
    text.split(|c: char| !(c.is_alphanumeric() || c == '$'))
        .map(|w| w.trim_matches('$'))
        .filter(|w| !w.is_empty())
}

/// Mean over query tokens of the best similarity to any candidate
fn token_similarity<'a, I>(tokens: &[&str], candidates: I) -> f64
where
    I: Iterator<Item = &'a str> + Clone,
{
    let total: f64 = tokens
        .iter()
        .map(|token| {
            candidates
                .clone()
                .map(|candidate| similarity(token, candidate))
                .fold(0.0, f64::max)
        })
        .sum();

    total / tokens.len() as f64
}

fn similarity(token: &str, candidate: &str) -> f64 {
    if token == candidate {
        1.0
    } else if candidate.starts_with(token) {
        PREFIX_SIMILARITY
    } else if candidate.contains(token) {
        INFIX_SIMILARITY
    } else if token.chars().count() >= MIN_FUZZY_TOKEN_LEN {
        jaro_winkler::similarity(token.chars(), candidate.chars())
    } else {
        0.0
    }
}
