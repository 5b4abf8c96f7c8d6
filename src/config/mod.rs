//! Configuration module for Paged-Extract
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so a run without a config file uses [`Config::default`].
//!
//! # Example
//!
//! ```no_run
//! use paged_extract::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("paged-extract.toml")).unwrap();
//! println!("Requests are spaced {}ms apart", config.fetcher.request_delay_ms);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, ExtractionConfig, FetcherConfig, InputConfig, OutputConfig, DEFAULT_PAGE_SIZE,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
