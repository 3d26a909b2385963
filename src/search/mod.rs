//! Query ranking over indexed sections
//!
//! Two strategies are available:
//! - `Substring`: deterministic additive scoring on exact substring matches
//! - `Fuzzy`: weighted, typo-tolerant similarity with a cut-off threshold
//!
//! Both are case-insensitive, return every section in document order for an
//! empty query, and break score ties by document order.

mod fuzzy;
mod substring;

pub use fuzzy::{fuzzy_score, FieldWeights, DEFAULT_FUZZY_THRESHOLD};
pub use substring::substring_score;

use crate::classify::Category;
use crate::extract::Section;
use serde::{Deserialize, Serialize};

/// Ranking strategy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum RankStrategy {
    /// Additive points for keyword, title and body substring matches
    #[default]
    Substring,
    /// Weighted similarity across keywords, title, body and category
    Fuzzy {
        /// Minimum best-field similarity for a section to be kept
        threshold: f64,
    },
}

impl RankStrategy {
    /// Fuzzy strategy with the default threshold
    pub fn fuzzy() -> Self {
        RankStrategy::Fuzzy {
            threshold: DEFAULT_FUZZY_THRESHOLD,
        }
    }

    /// Short name for display
    pub fn name(&self) -> &'static str {
        match self {
            RankStrategy::Substring => "substring",
            RankStrategy::Fuzzy { .. } => "fuzzy",
        }
    }
}

/// A ranked reference into the section list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Position of the section in document order
    pub index: usize,
    /// Relevance score (0 for an empty query)
    pub score: f64,
}

/// Normalize a raw query for matching
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Rank sections against a query
///
/// An empty query returns every section in document order with score 0. A
/// query nothing matches returns an empty list.
pub fn rank(sections: &[Section], query: &str, strategy: RankStrategy) -> Vec<Hit> {
    let query = normalize_query(query);

    if query.is_empty() {
        return sections
            .iter()
            .enumerate()
            .map(|(index, _)| Hit { index, score: 0.0 })
            .collect();
    }

    let mut hits: Vec<Hit> = sections
        .iter()
        .enumerate()
        .filter_map(|(index, section)| {
            let score = match strategy {
                RankStrategy::Substring => substring_score(section, &query),
                RankStrategy::Fuzzy { threshold } => {
                    fuzzy_score(section, &query, &FieldWeights::default(), threshold)
                }
            }?;
            Some(Hit { index, score })
        })
        .collect();

    // Stable sort keeps document order among equal scores
    hits.sort_by(|a, b| b.score.total_cmp(&a.score));

    tracing::trace!(query = %query, strategy = strategy.name(), hits = hits.len(), "Ranked sections");

    hits
}

/// Optional narrowing applied after ranking
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    /// Keep only sections of this category
    pub category: Option<Category>,
    /// Keep at most this many results
    pub limit: Option<usize>,
}

impl SearchFilter {
    /// Apply the filter to ranked hits
    pub fn apply(&self, sections: &[Section], hits: Vec<Hit>) -> Vec<Hit> {
        let filtered = hits
            .into_iter()
            .filter(|hit| match self.category {
                Some(category) => sections[hit.index].category == category,
                None => true,
            });

        match self.limit {
            Some(limit) => filtered.take(limit).collect(),
            None => filtered.collect(),
        }
    }
}
