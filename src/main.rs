//! Fight-Finder main entry point
//!
//! This is the command-line interface for the Fight-Finder crawler.

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use fight_finder::config::{load_config_with_hash, validate, Config};
use fight_finder::crawler::crawl;
use fight_finder::output::{output_paths, print_statistics};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Fight-Finder: a fighter/fight graph crawler
///
/// Starts from an organisation's event index, follows every fighter on every
/// event card and then their opponents, and writes one TSV of fighters and
/// one TSV of fights, both dated with the run date.
#[derive(Parser, Debug)]
#[command(name = "fight-finder")]
#[command(version)]
#[command(about = "A fighter/fight graph crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Override the maximum opponent depth
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Override the output file prefix
    #[arg(long, value_name = "PREFIX")]
    output_prefix: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = load(cli.config.as_ref())?;

    if let Some(max_depth) = cli.max_depth {
        config.crawler.max_depth = max_depth;
    }
    if let Some(prefix) = cli.output_prefix {
        config.output.prefix = prefix;
    }
    validate(&config).context("Invalid configuration after command-line overrides")?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("fight_finder=info,warn"),
            1 => EnvFilter::new("fight_finder=debug,info"),
            2 => EnvFilter::new("fight_finder=trace,debug"),
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

fn load(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::info!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    Ok(config)
}

/// Handles the --dry-run mode: shows the effective settings and output files
fn handle_dry_run(config: &Config) {
    println!("=== Fight-Finder Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Root URL: {}", config.crawler.root_url);
    println!("  Event path prefix: {}", config.crawler.event_path_prefix);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!(
        "  Max concurrent fetches: {}",
        config.crawler.max_concurrent_fetches
    );
    println!(
        "  Request timeout: {}s",
        config.crawler.request_timeout_secs
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    let (fighters, fights) = output_paths(&config.output.prefix, Local::now().date_naive());
    println!("\nOutput:");
    println!("  Fighters: {}", fighters.display());
    println!("  Fights: {}", fights.display());

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    let report = match crawl(config).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    print_statistics(&report.statistics);

    println!();
    println!("✓ Fighters written to: {}", report.sink.fighters_path().display());
    println!("✓ Fights written to: {}", report.sink.fights_path().display());

    Ok(())
}
