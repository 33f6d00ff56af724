//! Serp-Rake main entry point
//!
//! Command-line interface for the throttled SERP scraper: loads a TOML
//! configuration, then runs the scrape → serialize → save pipeline for the
//! configured engine and keywords.

use anyhow::Context;
use clap::Parser;
use serp_rake::config::{load_config, Config};
use serp_rake::{ScrapeOptions, SerpScraper};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Serp-Rake: a throttled search-engine result page scraper
///
/// Scrapes result pages for the configured keywords while keeping outbound
/// requests inside the configured budget, then serializes and stores the
/// captured pages in the output directory.
#[derive(Parser, Debug)]
#[command(name = "serp-rake")]
#[command(version = "0.1.0")]
#[command(about = "A throttled SERP scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Skip the admission check (the fixed inter-request delay still applies)
    #[arg(long)]
    no_throttling: bool,

    /// Validate config and show what would be scraped without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_scrape(config, cli.no_throttling).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("serp_rake=info,warn"),
            1 => EnvFilter::new("serp_rake=debug,info"),
            2 => EnvFilter::new("serp_rake=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows the scrape plan
fn handle_dry_run(config: &Config) {
    println!("=== Serp-Rake Dry Run ===\n");

    println!("Engine: {}", config.scraper.engine);
    println!("Pages per keyword: {}", config.scraper.pages_to_scrape);
    println!("Timezone: {}", config.scraper.timezone);
    println!("Request delay: {}ms", config.scraper.request_delay_ms);
    println!("Cache TTL: {}h", config.scraper.cache_ttl_hours);

    println!("\nDirectories:");
    println!("  Output: {}", config.scraper.out_dir);
    println!("  Fetcher cache: {}", config.scraper.fetcher_cache_dir);
    println!("  Serializer cache: {}", config.scraper.serializer_cache_dir);

    println!("\nBudget:");
    println!("  Global threshold: {}", config.throttle.global_threshold);
    match config.throttle.component_threshold {
        Some(threshold) => println!("  Per-keyword threshold: {}", threshold),
        None => println!("  Per-keyword threshold: unchecked"),
    }

    println!("\nKeywords ({}):", config.scraper.keywords.len());
    for keyword in &config.scraper.keywords {
        println!("  - {}", keyword);
    }

    let total = config.scraper.keywords.len() as u32 * config.scraper.pages_to_scrape;
    println!("\n✓ Configuration is valid");
    println!("✓ Would request up to {} pages", total);
}

/// Runs the scrape → serialize → save pipeline
async fn handle_scrape(config: Config, no_throttling: bool) -> anyhow::Result<()> {
    let options = ScrapeOptions {
        pages: config.scraper.pages_to_scrape,
        remove_on_complete: false,
        timezone: config.scraper.timezone.clone(),
        throttling: !no_throttling,
    };
    let format = config.output.format.clone();
    let remove_on_complete = config.output.remove_on_complete;

    let mut scraper = SerpScraper::build(&config)?;

    if !scraper.scrape_all(&options).await? {
        anyhow::bail!("scrape refused: batch would exceed the request budget");
    }
    tracing::info!("Collected {} pages", scraper.fetched_pages().len());

    if !scraper.serialize(&format, remove_on_complete)? {
        anyhow::bail!("nothing to serialize");
    }

    if !scraper.save(remove_on_complete)? {
        anyhow::bail!("nothing to save");
    }

    println!("✓ Saved pages to: {}", scraper.out_dir().display());
    Ok(())
}
