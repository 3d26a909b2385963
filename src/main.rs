//! docsift - search Markdown documentation by section
//!
//! Fetches a documentation corpus, splits it into classified sections and
//! answers queries from the command line or an interactive UI.

use anyhow::Result;
use docsift::cli::{
    handle_config, list, load_config, open_session, refresh, report_load, search, show, stats,
    Cli, Commands,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Setup logging; stdout is reserved for command output
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if let Commands::Config(ref args) = cli.command {
        return handle_config(&cli, args);
    }

    let config = load_config(&cli)?;
    let mut session = open_session(&cli, &config)?;

    // Refresh skips the read-through load
    if let Commands::Refresh(ref args) = cli.command {
        return refresh(&mut session, args, cli.format).await;
    }

    let report = session.load().await?;
    report_load(&report);

    match cli.command {
        Commands::Search(ref args) => search(&mut session, &config, args, cli.format)?,
        Commands::Show(ref args) => show(&session, &config, args, cli.format)?,
        Commands::List(ref args) => list(&session, args, cli.format)?,
        Commands::Stats => stats(&session, cli.format)?,
        Commands::Tui(ref args) => {
            docsift::tui::run(session, &config, &args.query.join(" "))?;
        }
        Commands::Refresh(_) | Commands::Config(_) => {}
    }

    Ok(())
}
