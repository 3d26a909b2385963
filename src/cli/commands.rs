//! Command implementations

use super::{Cli, ConfigArgs, ListArgs, OutputFormat, RefreshArgs, SearchArgs, ShowArgs};
use crate::cache::{DocCache, FileCache, MemoryCache};
use crate::classify::{classify_with_rule, Category};
use crate::config::AppConfig;
use crate::extract::{code_blocks, Section};
use crate::search::{Hit, SearchFilter};
use crate::session::{LoadReport, Provenance, SearchSession, SessionOptions};
use crate::source::{DocumentSource, FileSource, HttpSource};
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A search result as printed by `search`
#[derive(Debug, Serialize)]
pub struct SearchResult<'a> {
    pub title: &'a str,
    pub category: Category,
    pub score: f64,
    pub line: usize,
    pub url: String,
    pub keywords: &'a [String],
    pub summary: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<&'static str>,
}

/// Resolve the configuration file path
pub fn config_path(cli: &Cli) -> Result<PathBuf> {
    cli.config
        .clone()
        .or_else(AppConfig::default_path)
        .ok_or_else(|| anyhow::anyhow!("Could not determine the config directory; pass --config"))
}

/// Load configuration for this invocation
pub fn load_config(cli: &Cli) -> Result<AppConfig> {
    AppConfig::load_or_default(&config_path(cli)?)
}

/// Build a session with the cache and source selected by the flags
///
/// A local `--file` is never cached on disk. When the user cache directory
/// is unavailable the session falls back to an in-memory cache.
pub fn open_session(cli: &Cli, config: &AppConfig) -> Result<SearchSession> {
    let source: Box<dyn DocumentSource> = match cli.file {
        Some(ref path) => Box::new(FileSource::new(path)),
        None => Box::new(HttpSource::new(&config.source_url)?),
    };

    let cache: Box<dyn DocCache> = if cli.no_cache || cli.file.is_some() {
        Box::new(MemoryCache::new())
    } else {
        match FileCache::in_user_cache_dir() {
            Ok(cache) => {
                tracing::debug!("Using cache directory {:?}", cache.dir());
                Box::new(cache)
            }
            Err(e) => {
                tracing::warn!("{}; caching in memory only", e);
                Box::new(MemoryCache::new())
            }
        }
    };

    let options = SessionOptions {
        segmenter: config.segmenter(),
        strategy: config.rank_strategy(),
        ttl: config.cache_ttl(),
    };

    Ok(SearchSession::new(cache, source, options))
}

/// Tell the user about a degraded load without failing the command
pub fn report_load(report: &LoadReport) {
    if report.provenance == Provenance::Stale {
        eprintln!(
            "⚠ Could not refresh {}; using cached copy from {}",
            report.origin,
            report.fetched_at.format("%Y-%m-%d %H:%M UTC")
        );
        if let Some(ref warning) = report.warning {
            eprintln!("  {}", warning);
        }
    }
}

fn parse_category(value: Option<&str>) -> Result<Option<Category>> {
    value.map(str::parse::<Category>).transpose()
}

/// Rank sections and print the results
pub fn search(
    session: &mut SearchSession,
    config: &AppConfig,
    args: &SearchArgs,
    format: OutputFormat,
) -> Result<()> {
    if args.fuzzy {
        session.set_strategy(config.fuzzy_strategy());
    }

    let query = args.query.join(" ");
    let limit = args.limit.unwrap_or(config.result_limit);
    let filter = SearchFilter {
        category: parse_category(args.category.as_deref())?,
        limit: (limit > 0).then_some(limit),
    };

    let hits = session.search_filtered(&query, &filter);
    let results = collect_results(session, &hits, &config.docs_base_url, args.explain);

    match format {
        OutputFormat::Json => print_json(&results)?,
        OutputFormat::Text => print_results_text(&query, &results, args.explain),
    }

    Ok(())
}

/// Pair ranked hits with their sections
pub fn collect_results<'a>(
    session: &'a SearchSession,
    hits: &[Hit],
    base_url: &str,
    explain: bool,
) -> Vec<SearchResult<'a>> {
    hits.iter()
        .filter_map(|hit| session.section(hit).map(|section| (hit, section)))
        .map(|(hit, section)| SearchResult {
            title: &section.title,
            category: section.category,
            score: hit.score,
            line: section.line,
            url: section.doc_url(base_url),
            keywords: &section.keywords,
            summary: section.summary(),
            rule: if explain {
                classify_with_rule(&section.title, &section.body).1
            } else {
                None
            },
        })
        .collect()
}

fn print_results_text(query: &str, results: &[SearchResult<'_>], explain: bool) {
    if results.is_empty() {
        println!("No sections match {:?}.", query);
        return;
    }

    for result in results {
        println!(
            "{} [{}] {}  (line {})",
            result.category.icon(),
            result.category,
            result.title,
            result.line
        );
        println!("   {}", result.url);
        if !result.summary.is_empty() {
            println!("   {}", truncate(result.summary, 100));
        }
        if explain {
            println!(
                "   score: {}  rule: {}",
                result.score,
                result.rule.unwrap_or("fallback")
            );
        }
        println!();
    }
}

/// Print one section
pub fn show(
    session: &SearchSession,
    config: &AppConfig,
    args: &ShowArgs,
    format: OutputFormat,
) -> Result<()> {
    let title = args.title.join(" ");
    let section = session
        .find(&title)
        .ok_or_else(|| anyhow::anyhow!("No section matches {:?}", title))?;

    if args.code {
        let blocks = code_blocks(&section.body);
        match format {
            OutputFormat::Json => print_json(&blocks)?,
            OutputFormat::Text => {
                if blocks.is_empty() {
                    println!("No code blocks in {:?}.", section.title);
                }
                for block in &blocks {
                    println!("```{}", block.language.as_deref().unwrap_or(""));
                    print!("{}", block.content);
                    println!("```");
                }
            }
        }
        return Ok(());
    }

    match format {
        OutputFormat::Json => print_json(section)?,
        OutputFormat::Text => {
            println!("{} {}", "#".repeat(usize::from(section.level)), section.title);
            println!();
            println!("{}", section.body);
            println!();
            println!(
                "{} {}  {}",
                section.category.icon(),
                section.category,
                section.doc_url(&config.docs_base_url)
            );
        }
    }

    Ok(())
}

/// List sections in document order
pub fn list(session: &SearchSession, args: &ListArgs, format: OutputFormat) -> Result<()> {
    let category = parse_category(args.category.as_deref())?;
    let sections: Vec<&Section> = session
        .sections()
        .iter()
        .filter(|s| category.map_or(true, |c| s.category == c))
        .collect();

    match format {
        OutputFormat::Json => print_json(&sections)?,
        OutputFormat::Text => {
            for section in &sections {
                let indent = "  ".repeat(usize::from(section.level.saturating_sub(1)));
                println!(
                    "{:>6}  {}{} {}",
                    section.line,
                    indent,
                    section.category.icon(),
                    section.title
                );
            }
            println!("\n{} section(s)", sections.len());
        }
    }

    Ok(())
}

/// Count sections per category
pub fn category_counts(sections: &[Section]) -> BTreeMap<Category, usize> {
    let mut counts = BTreeMap::new();
    for section in sections {
        *counts.entry(section.category).or_insert(0) += 1;
    }
    counts
}

/// Print corpus statistics
pub fn stats(session: &SearchSession, format: OutputFormat) -> Result<()> {
    let counts = category_counts(session.sections());

    match format {
        OutputFormat::Json => {
            let by_label: BTreeMap<&str, usize> =
                counts.iter().map(|(c, n)| (c.label(), *n)).collect();
            print_json(&serde_json::json!({
                "sections": session.sections().len(),
                "provenance": session.last_load().map(|r| r.provenance.to_string()),
                "categories": by_label,
            }))?;
        }
        OutputFormat::Text => {
            println!("docsift Statistics");
            println!("==================\n");

            if let Some(report) = session.last_load() {
                println!("Source: {}", report.origin);
                println!(
                    "Loaded: {} ({})",
                    report.provenance,
                    report.fetched_at.format("%Y-%m-%d %H:%M UTC")
                );
            }
            println!("Sections: {}", session.sections().len());
            println!("Strategy: {}\n", session.strategy().name());

            for (category, count) in &counts {
                println!("  {} {:<12} {}", category.icon(), category.label(), count);
            }
        }
    }

    Ok(())
}

/// Refetch the corpus and report the outcome
pub async fn refresh(
    session: &mut SearchSession,
    args: &RefreshArgs,
    format: OutputFormat,
) -> Result<()> {
    if args.purge {
        session.purge_cache().context("Failed to delete the cached corpus")?;
        match format {
            OutputFormat::Json => print_json(&serde_json::json!({ "purged": true }))?,
            OutputFormat::Text => println!("✓ Cached corpus deleted"),
        }
        return Ok(());
    }

    let report = session.refresh().await?;

    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "sections": report.sections,
            "origin": report.origin,
            "fetched_at": report.fetched_at,
        }))?,
        OutputFormat::Text => {
            println!("✓ Refreshed {} ({} sections)", report.origin, report.sections)
        }
    }

    Ok(())
}

/// Handle config command
pub fn handle_config(cli: &Cli, args: &ConfigArgs) -> Result<()> {
    let path = config_path(cli)?;

    if args.path {
        println!("{}", path.display());
        return Ok(());
    }

    if args.reset {
        AppConfig::default()
            .save(&path)
            .with_context(|| format!("Failed to reset {:?}", path))?;
        println!("✓ Configuration reset to defaults");
        return Ok(());
    }

    let config = AppConfig::load_or_default(&path)?;

    if let Some(ref key) = args.get {
        match config.get(key) {
            Some(value) => println!("{}", value),
            None => anyhow::bail!("Unknown config key: {}", key),
        }
        return Ok(());
    }

    match cli.format {
        OutputFormat::Json => print_json(&config)?,
        OutputFormat::Text => {
            println!("docsift Configuration ({})", path.display());
            println!("======================\n");
            print!(
                "{}",
                toml::to_string_pretty(&config).context("Failed to serialize configuration")?
            );
        }
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}
