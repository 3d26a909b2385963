//! CLI interface using clap
//!
//! Provides the command-line interface for docsift

mod commands;

pub use commands::*;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// docsift - search a Markdown documentation corpus by section
#[derive(Parser, Debug)]
#[command(name = "docsift")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, env = "DOCSIFT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Read the corpus from a local Markdown file instead of the remote source
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Don't read or write the on-disk cache
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json)
    #[arg(short = 'o', long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rank sections against a query
    Search(SearchArgs),

    /// Print one section in full
    Show(ShowArgs),

    /// List sections in document order
    List(ListArgs),

    /// Show section counts per category
    Stats,

    /// Fetch the corpus again, replacing the cached copy
    Refresh(RefreshArgs),

    /// Launch the interactive search UI
    Tui(TuiArgs),

    /// Show or reset configuration
    Config(ConfigArgs),
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Arguments for search command
#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Search query (words are joined with spaces)
    #[arg(required = true)]
    pub query: Vec<String>,

    /// Use typo-tolerant fuzzy ranking
    #[arg(long)]
    pub fuzzy: bool,

    /// Only show sections of this category
    #[arg(long)]
    pub category: Option<String>,

    /// Maximum number of results (0 for unlimited)
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Show the score and the classification rule of each result
    #[arg(long)]
    pub explain: bool,
}

/// Arguments for show command
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Section title (exact match preferred, else best match)
    #[arg(required = true)]
    pub title: Vec<String>,

    /// Print only the fenced code blocks of the section
    #[arg(long)]
    pub code: bool,
}

/// Arguments for list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Only list sections of this category
    #[arg(long)]
    pub category: Option<String>,
}

/// Arguments for refresh command
#[derive(Parser, Debug)]
pub struct RefreshArgs {
    /// Only delete the cached copy; the next command fetches it again
    #[arg(long)]
    pub purge: bool,
}

/// Arguments for TUI command
#[derive(Parser, Debug)]
pub struct TuiArgs {
    /// Initial query
    pub query: Vec<String>,
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Show current configuration
    #[arg(long)]
    pub show: bool,

    /// Get a configuration value
    #[arg(long)]
    pub get: Option<String>,

    /// Reset to defaults
    #[arg(long)]
    pub reset: bool,

    /// Print the configuration file path
    #[arg(long)]
    pub path: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
