//! Crawler module for fetching and extracting pages
//!
//! This module contains the core per-URL logic, including:
//! - Request pacing between consecutive fetches
//! - HTTP fetching and response classification
//! - HTML content extraction
//! - Window orchestration

mod coordinator;
mod extractor;
mod fetcher;
mod scheduler;

pub use coordinator::{generate_batch_id, run_window, Pipeline, RunReport};
pub use extractor::{
    collapse_whitespace, ContentExtractor, Extracted, ExtractionResult, CONTENT_NOT_FOUND,
    EXTRACTION_FAILED, FLAG_SET, META_FIELDS, META_NOT_FOUND,
};
pub use fetcher::{
    build_http_client, fetch_url, is_html_content_type, FetchErrorKind, FetchOutcome,
    PageFetcher, RateLimitedFetcher,
};
pub use scheduler::RequestPacer;
