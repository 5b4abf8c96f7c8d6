//! Paged-Extract main entry point
//!
//! This is the command-line interface for the Paged-Extract window runner.

use anyhow::Context;
use clap::Parser;
use paged_extract::config::{load_config_with_hash, validate, Config};
use paged_extract::crawler::{generate_batch_id, run_window};
use paged_extract::input::{load_urls, PageWindow};
use paged_extract::output::{print_statistics, AuditLog};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Paged-Extract: windowed, rate-limited page extraction
///
/// Fetches one window of a URL list, extracts content from HTML pages and
/// appends one CSV row per URL. Run repeatedly with increasing --start to
/// work through a large list across invocations.
#[derive(Parser, Debug)]
#[command(name = "paged-extract")]
#[command(version)]
#[command(about = "Windowed, rate-limited page extraction", long_about = None)]
struct Cli {
    /// Zero-based index of the first URL to process
    #[arg(long, default_value_t = 0)]
    start: usize,

    /// Number of URLs to process (defaults to output.page-size)
    #[arg(long)]
    size: Option<usize>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Override the URL list path
    #[arg(long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Override the CSV output path
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Override the audit log path
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show which URLs the window covers without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    // An explicit window is checked before any file or network I/O
    let requested_window = match cli.size.map(|size| PageWindow::new(cli.start, size)).transpose() {
        Ok(window) => window,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let config = match load_configuration(&cli) {
        Ok(config) => config,
        Err(e) => {
            let log_path = cli
                .log
                .clone()
                .unwrap_or_else(|| PathBuf::from(Config::default().output.log_path));
            report_failure(&log_path, &e);
            return ExitCode::FAILURE;
        }
    };

    let log_path = PathBuf::from(&config.output.log_path);
    match run(&cli, config, requested_window).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_failure(&log_path, &e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("paged_extract=info,warn"),
            1 => EnvFilter::new("paged_extract=debug,info"),
            2 => EnvFilter::new("paged_extract=trace,debug"),
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

/// Loads the config file (if any) and applies command-line overrides
fn load_configuration(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("loading {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(input) = &cli.input {
        config.input.urls_path = input.display().to_string();
    }
    if let Some(output) = &cli.output {
        config.output.csv_path = output.display().to_string();
    }
    if let Some(log) = &cli.log {
        config.output.log_path = log.display().to_string();
    }

    validate(&config).context("validating configuration")?;
    Ok(config)
}

/// Handles one window: validate, load, fetch, persist
async fn run(cli: &Cli, config: Config, requested_window: Option<PageWindow>) -> anyhow::Result<()> {
    let window = match requested_window {
        Some(window) => window,
        None => PageWindow::new(cli.start, config.output.page_size)?,
    };

    let urls = load_urls(Path::new(&config.input.urls_path))?;
    tracing::info!(
        "Loaded {} URLs from {}",
        urls.len(),
        config.input.urls_path
    );

    if cli.dry_run {
        handle_dry_run(&urls, window);
        return Ok(());
    }

    let batch_id = generate_batch_id(chrono::Utc::now());
    let report = run_window(&config, &urls, window, batch_id).await?;

    if report.processed() == 0 {
        tracing::info!("Nothing to do: window starts past the end of the list");
        return Ok(());
    }

    tracing::info!(
        "Batch {} complete: {} URLs written to {}",
        report.batch_id,
        report.processed(),
        config.output.csv_path
    );

    if !cli.quiet {
        print_statistics(&report.stats);
    }

    Ok(())
}

/// Handles the --dry-run mode: shows which URLs would be processed
fn handle_dry_run(urls: &[String], window: PageWindow) {
    let range = window.range(urls.len());

    println!("=== Paged-Extract Dry Run ===\n");
    println!("Total URLs: {}", urls.len());

    if range.is_empty() {
        println!("Window start {} is past the end of the list; nothing to do", window.start);
        return;
    }

    println!("Window: rows {} to {} ({} URLs)\n", range.start + 1, range.end, range.len());
    for (local_index, url) in urls.iter().skip(range.start).take(range.len()).enumerate() {
        println!("  {:>6}  {}", window.row_number(local_index), url);
    }
}

/// Logs a fatal error and makes a best-effort audit log entry
fn report_failure(log_path: &Path, error: &anyhow::Error) {
    tracing::error!("Run failed: {:#}", error);

    if let Err(e) = AuditLog::new(log_path).append(&format!("Run failed: {:#}", error)) {
        tracing::error!("Could not write failure to {}: {}", log_path.display(), e);
    }
}
