//! listing-crawler main entry point
//!
//! This is the command-line interface for the listing crawler.

use anyhow::Context;
use clap::Parser;
use listing_crawler::config::{load_config, validate, Config};
use listing_crawler::crawler::crawl;
use listing_crawler::output::{export_records, print_statistics, CrawlStatistics};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// listing-crawler: walk vehicle listing pages and export every ad as JSON
///
/// Starting from a results page, the crawler follows the "next page" link
/// until the last page or the page limit, extracting each standard listing.
#[derive(Parser, Debug)]
#[command(name = "listing-crawler")]
#[command(version)]
#[command(about = "Crawl paginated vehicle listings", long_about = None)]
struct Cli {
    /// First results page (overrides the config file)
    #[arg(value_name = "START_URL")]
    start_url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Maximum number of result pages to fetch
    #[arg(short, long, value_name = "N")]
    pages: Option<usize>,

    /// Origin prepended to next-page links
    #[arg(long, value_name = "ORIGIN")]
    base_origin: Option<String>,

    /// Write listings to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    tracing::info!(
        "Crawling up to {} pages starting at {}",
        config.crawler.pagination_limit,
        config.crawler.start_url
    );

    let outcome = crawl(&config).await.context("Crawl could not start")?;

    if !cli.quiet {
        print_statistics(&CrawlStatistics::from_outcome(&outcome));
    }

    export_records(&outcome.records, &config.output).context("Failed to write listings")?;

    if !outcome.termination.is_success() {
        tracing::warn!(
            "Crawl stopped early at {}: pagination control not found",
            outcome.last_url
        );
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout stays clean for the JSON export.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("listing_crawler=info,warn"),
            1 => EnvFilter::new("listing_crawler=debug,info"),
            2 => EnvFilter::new("listing_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (or defaults) and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(start_url) = &cli.start_url {
        config.crawler.start_url = start_url.clone();
    }
    if let Some(pages) = cli.pages {
        config.crawler.pagination_limit = pages;
    }
    if let Some(origin) = &cli.base_origin {
        config.crawler.base_origin = origin.clone();
    }
    if let Some(output) = &cli.output {
        config.output.path = Some(output.to_string_lossy().into_owned());
    }
    if cli.pretty {
        config.output.pretty = true;
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}
