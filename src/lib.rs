//! Paged-Extract: windowed, rate-limited page extraction
//!
//! This crate fetches a fixed list of URLs one window at a time, classifies
//! each response, extracts structured content from HTML pages and appends one
//! CSV row per URL to a durable output file.

pub mod config;
pub mod crawler;
pub mod input;
pub mod output;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Paged-Extract operations
///
/// Only run-fatal conditions live here. Per-URL failures are reported as
/// data through [`crawler::FetchOutcome`] and never surface as an `Err`.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read URL list {path}: {source}")]
    Input {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Persistence error: {0}")]
    Persistence(#[from] output::OutputError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),
}

/// Result type alias for Paged-Extract operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{FetchErrorKind, FetchOutcome, Pipeline, RateLimitedFetcher};
pub use input::{load_urls, PageWindow};
pub use output::{AuditLog, CsvResultSink, OutputRecord, ResultBuilder};
