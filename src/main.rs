//! Catalog-Sweep main entry point
//!
//! This is the command-line interface for the Catalog-Sweep catalog crawler.

use anyhow::Context;
use catalog_sweep::config::{load_config_with_hash, Config};
use catalog_sweep::crawler::{crawl, CrawlMode};
use catalog_sweep::events::{EventSink, TracingSink};
use catalog_sweep::menu::{parse_page_count, parse_page_number, parse_positive, prompt_mode};
use catalog_sweep::output::{print_statistics, ExportKind, ExportResult, ExportedFile, Exporter};
use catalog_sweep::Record;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Catalog-Sweep: a paginating catalog crawler
///
/// Catalog-Sweep walks the pages of a catalog listing, extracts title, price
/// and availability of every item, prints summary statistics and exports the
/// records to CSV files.
#[derive(Parser, Debug)]
#[command(name = "catalog-sweep")]
#[command(version)]
#[command(about = "A paginating catalog crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Directory for export files
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Pause between page fetches in milliseconds
    #[arg(long, value_name = "MS")]
    delay: Option<u64>,

    /// Name of the main export file
    #[arg(short, long, value_name = "NAME", conflicts_with = "append")]
    output: Option<String>,

    /// Append records to an existing CSV file instead of writing new files
    #[arg(long, value_name = "FILE")]
    append: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

/// Crawl mode; an interactive menu is shown when omitted
#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape all pages
    All,

    /// Scrape a specific page (invalid numbers fall back to page 1)
    Page {
        #[arg(value_name = "PAGE")]
        page: String,
    },

    /// Scrape the first N pages (invalid numbers fall back to 5)
    First {
        #[arg(value_name = "PAGES")]
        pages: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(&cli)?;

    println!("=== Books to Scrape Web Scraper ===");

    let mode = match &cli.command {
        Some(command) => mode_from_command(command),
        None => {
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            prompt_mode(&mut stdin.lock(), &mut stdout).context("Failed to read menu choice")?
        }
    };

    handle_crawl(&config, mode, &cli).await?;

    println!("\nScraping process completed!");
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalog_sweep=info,warn"),
            1 => EnvFilter::new("catalog_sweep=debug,info"),
            2 => EnvFilter::new("catalog_sweep=trace,debug"),
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

/// Loads the configuration file, if any, and applies command-line overrides
fn load_configuration(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.clone();
    }
    if let Some(delay) = cli.delay {
        config.crawler.politeness_delay = delay;
    }

    Ok(config)
}

fn mode_from_command(command: &Command) -> CrawlMode {
    match command {
        Command::All => CrawlMode::All,
        Command::Page { page } => {
            if parse_positive(page).is_none() {
                println!("Invalid page number. Using page 1.");
            }
            CrawlMode::SinglePage(parse_page_number(page))
        }
        Command::First { pages } => {
            if parse_positive(pages).is_none() {
                println!("Invalid number. Using 5 pages.");
            }
            CrawlMode::FirstPages(parse_page_count(pages))
        }
    }
}

/// Runs the crawl, prints statistics and exports the records
///
/// Only start-up failures are returned; a crawl that stops on a page error
/// or an export that fails is reported and still counts as completed.
async fn handle_crawl(config: &Config, mode: CrawlMode, cli: &Cli) -> anyhow::Result<()> {
    match mode {
        CrawlMode::All => println!("Scraping all pages..."),
        CrawlMode::SinglePage(page) => println!("Scraping page {}...", page),
        CrawlMode::FirstPages(count) => println!("Scraping first {} pages...", count),
    }

    let events: Arc<dyn EventSink> = Arc::new(TracingSink);
    let outcome = crawl(config, mode, events.clone())
        .await
        .context("Failed to start crawl")?;

    if let Some(failure) = &outcome.failure {
        eprintln!("Crawl stopped early: {}", failure);
    }

    if outcome.records.is_empty() {
        match mode {
            CrawlMode::SinglePage(page) => println!("No books found on page {}", page),
            _ => println!("No books were extracted!"),
        }
        return Ok(());
    }

    print_statistics(&outcome.statistics(), &outcome.records);

    let mut exporter = Exporter::new(config.output.clone(), events);
    match export_records(&mut exporter, &outcome.records, mode, cli) {
        Ok(files) => print_exported(&files),
        Err(e) => eprintln!("Error creating CSV files: {}", e),
    }

    Ok(())
}

fn export_records(
    exporter: &mut Exporter,
    records: &[Record],
    mode: CrawlMode,
    cli: &Cli,
) -> ExportResult<Vec<ExportedFile>> {
    if let Some(path) = &cli.append {
        return exporter.append_records(records, path).map(|file| vec![file]);
    }

    let name = cli.output.clone();
    match mode {
        CrawlMode::All => exporter.export(records, name.as_deref()),
        CrawlMode::SinglePage(page) => {
            let name = name.unwrap_or_else(|| format!("books_page_{}.csv", page));
            exporter.write_records(records, Some(&name)).map(|file| vec![file])
        }
        CrawlMode::FirstPages(count) => {
            let name = name.unwrap_or_else(|| format!("books_first_{}_pages.csv", count));
            exporter.write_records(records, Some(&name)).map(|file| vec![file])
        }
    }
}

fn print_exported(files: &[ExportedFile]) {
    println!("\nCSV files created:");
    for file in files {
        let label = match file.kind {
            ExportKind::Main => "Main file",
            ExportKind::InStock => "In stock books",
            ExportKind::OutOfStock => "Out of stock books",
        };
        println!("- {}: {} ({} rows)", label, file.path.display(), file.rows);
    }
}
