//! User configuration for docsift

use crate::extract::SegmenterConfig;
use crate::search::{RankStrategy, DEFAULT_FUZZY_THRESHOLD};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which ranking strategy to use by default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Substring,
    Fuzzy,
}

/// Configuration loaded from `config.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// URL of the full documentation corpus
    #[serde(default = "default_source_url")]
    pub source_url: String,

    /// Base URL that section anchors are appended to
    #[serde(default = "default_docs_base_url")]
    pub docs_base_url: String,

    /// Minutes a cached copy stays fresh (0 always refetches)
    #[serde(default = "default_cache_ttl_minutes")]
    pub cache_ttl_minutes: i64,

    /// Deepest heading level that starts a new section (1..=3)
    #[serde(default = "default_max_depth")]
    pub max_depth: u8,

    /// Ignore heading-like lines inside fenced code blocks
    #[serde(default = "default_respect_code_fences")]
    pub respect_code_fences: bool,

    /// Ranking strategy
    #[serde(default = "default_strategy")]
    pub strategy: StrategyKind,

    /// Minimum similarity for the fuzzy strategy (0.0 - 1.0)
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: f64,

    /// Maximum results printed by `search` (0 for unlimited)
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,
}

fn default_source_url() -> String {
    "https://svelte.dev/llms-full.txt".to_string()
}

fn default_docs_base_url() -> String {
    "https://svelte.dev/docs".to_string()
}

fn default_cache_ttl_minutes() -> i64 {
    60
}

fn default_max_depth() -> u8 {
    3
}

fn default_respect_code_fences() -> bool {
    true
}

fn default_strategy() -> StrategyKind {
    StrategyKind::Substring
}

fn default_fuzzy_threshold() -> f64 {
    DEFAULT_FUZZY_THRESHOLD
}

fn default_result_limit() -> usize {
    20
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source_url: default_source_url(),
            docs_base_url: default_docs_base_url(),
            cache_ttl_minutes: default_cache_ttl_minutes(),
            max_depth: default_max_depth(),
            respect_code_fences: default_respect_code_fences(),
            strategy: default_strategy(),
            fuzzy_threshold: default_fuzzy_threshold(),
            result_limit: default_result_limit(),
        }
    }
}

impl AppConfig {
    /// Default location: `<config_dir>/docsift/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(crate::APP_NAME).join("config.toml"))
    }

    /// Load configuration from `path`, or return defaults if it doesn't exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: AppConfig = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    /// Segmentation policy derived from this configuration
    pub fn segmenter(&self) -> SegmenterConfig {
        SegmenterConfig {
            respect_code_fences: self.respect_code_fences,
            ..SegmenterConfig::default()
        }
        .with_max_depth(self.max_depth)
    }

    /// Ranking strategy derived from this configuration
    pub fn rank_strategy(&self) -> RankStrategy {
        match self.strategy {
            StrategyKind::Substring => RankStrategy::Substring,
            StrategyKind::Fuzzy => self.fuzzy_strategy(),
        }
    }

    /// Fuzzy ranking with the configured threshold
    pub fn fuzzy_strategy(&self) -> RankStrategy {
        RankStrategy::Fuzzy {
            threshold: self.fuzzy_threshold.clamp(0.0, 1.0),
        }
    }

    /// Cache time-to-live
    pub fn cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.cache_ttl_minutes.max(0))
    }

    /// Look up a single value by key, as printed by `config --get`
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "source_url" => self.source_url.clone(),
            "docs_base_url" => self.docs_base_url.clone(),
            "cache_ttl_minutes" => self.cache_ttl_minutes.to_string(),
            "max_depth" => self.max_depth.to_string(),
            "respect_code_fences" => self.respect_code_fences.to_string(),
            "strategy" => format!("{:?}", self.strategy).to_lowercase(),
            "fuzzy_threshold" => self.fuzzy_threshold.to_string(),
            "result_limit" => self.result_limit.to_string(),
            _ => return None,
        };
        Some(value)
    }
}
