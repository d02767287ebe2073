//! Comic-Harvester main entry point
//!
//! This is the command-line interface for the Comic-Harvester downloader and
//! archive auditor.

use clap::Parser;
use comic_harvester::audit::{audit_directory, AuditOptions};
use comic_harvester::config::{load_config_with_hash, Config};
use comic_harvester::inventory::{detect_storage_roots, scan};
use comic_harvester::output::{print_audit_report, print_summary};
use comic_harvester::pipeline::harvest;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Comic-Harvester: a category crawler and archive downloader for comic sites
///
/// Comic-Harvester walks the configured categories, resolves every comic to
/// its direct download link and stores the archives locally, skipping what
/// is already there. The audit mode removes corrupted archives.
#[derive(Parser, Debug)]
#[command(name = "comic-harvester")]
#[command(version = "1.0.0")]
#[command(about = "Crawls comic categories and downloads their archives", long_about = None)]
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

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with_all = ["audit", "inventory"])]
    dry_run: bool,

    /// Verify stored archives and delete corrupted ones, then exit
    #[arg(long, conflicts_with_all = ["dry_run", "inventory"])]
    audit: bool,

    /// Directory to audit (overrides the configuration)
    #[arg(long, value_name = "DIR", requires = "audit")]
    audit_dir: Option<PathBuf>,

    /// Report corrupted archives without deleting them
    #[arg(long, requires = "audit")]
    keep_corrupt: bool,

    /// Scan local storage for existing archives, print the count and exit
    #[arg(long, conflicts_with_all = ["dry_run", "audit"])]
    inventory: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.audit {
        handle_audit(&config, cli.audit_dir, cli.keep_corrupt).await?;
    } else if cli.inventory {
        handle_inventory(&config).await?;
    } else {
        handle_harvest(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("comic_harvester=info,warn"),
            1 => EnvFilter::new("comic_harvester=debug,info"),
            2 => EnvFilter::new("comic_harvester=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Comic-Harvester Dry Run ===\n");

    println!("Crawler Configuration:");
    println!(
        "  Max concurrent downloads: {}",
        config.crawler.max_concurrent_downloads
    );
    println!("  Page timeout: {}s", config.crawler.page_timeout_secs);
    println!("  Asset timeout: {}s", config.crawler.asset_timeout_secs);
    match config.crawler.max_pages {
        Some(cap) => println!("  Max pages per category: {}", cap),
        None => println!("  Max pages per category: unlimited"),
    }

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    if let Some(contact) = &config.user_agent.contact_url {
        println!("  Contact URL: {}", contact);
    }

    println!("\nSite Rules:");
    println!("  Item markers: {}", config.site.item_markers.join(", "));
    if !config.site.item_prefixes.is_empty() {
        println!("  Item prefixes: {}", config.site.item_prefixes.join(", "));
    }
    println!("  Download marker: {}", config.site.download_marker);
    println!("  Default extension: .{}", config.site.default_extension);

    println!("\nOutput:");
    println!("  Download directory: {}", config.output.download_dir);
    println!(
        "  Inventory pre-filter: {}",
        if config.inventory.enabled { "on" } else { "off" }
    );

    println!("\nCategories ({}):", config.categories.len());
    for category in &config.categories {
        println!("  - {}: {}", category.name, category.url);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --audit mode: verifies archives and deletes corrupted ones
async fn handle_audit(
    config: &Config,
    audit_dir: Option<PathBuf>,
    keep_corrupt: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let directory = audit_dir
        .or_else(|| config.audit.directory.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(&config.output.download_dir));
    let options = AuditOptions {
        dry_run: keep_corrupt,
    };

    tracing::info!("Auditing archives in {}", directory.display());
    let report = tokio::task::spawn_blocking(move || audit_directory(&directory, options)).await?;

    print_audit_report(&report);
    Ok(())
}

/// Handles the --inventory mode: reports archives already on local storage
async fn handle_inventory(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let roots: Vec<PathBuf> = if config.inventory.roots.is_empty() {
        detect_storage_roots()
    } else {
        config.inventory.roots.iter().map(PathBuf::from).collect()
    };
    let subfolders = config.inventory.subfolders.clone();

    println!("Storage roots ({}):", roots.len());
    for root in &roots {
        println!("  - {}", root.display());
    }

    let inventory = tokio::task::spawn_blocking(move || scan(&roots, &subfolders)).await?;
    println!("\nFound {} comics already downloaded.", inventory.len());
    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Categories: {}, download directory: {}",
        config.categories.len(),
        config.output.download_dir
    );

    match harvest(config).await {
        Ok(summary) => {
            print_summary(&summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
