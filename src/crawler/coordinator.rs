//! Window pipeline - main run orchestration logic
//!
//! This module drives one invocation over one window of the URL list:
//! - Computing the window range
//! - Fetching each URL in list order through the rate-limited fetcher
//! - Building exactly one output record per URL
//! - Flushing the whole batch to the sink once the window is complete
//! - Writing the completion entry to the audit log

use crate::config::Config;
use crate::crawler::extractor::ContentExtractor;
use crate::crawler::fetcher::{FetchOutcome, PageFetcher, RateLimitedFetcher};
use crate::input::PageWindow;
use crate::output::{AuditLog, CsvResultSink, OutputRecord, ResultBuilder, ResultSink, RunStats};
use crate::ScrapeError;
use chrono::{DateTime, SecondsFormat, Utc};
use std::ops::Range;

/// What a completed run did
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Identifier stamped on every record of this run
    pub batch_id: String,

    /// Absolute index range of the URLs processed
    pub range: Range<usize>,

    /// Outcome counts for the window
    pub stats: RunStats,
}

impl RunReport {
    /// Number of URLs processed (and records written)
    pub fn processed(&self) -> usize {
        self.range.len()
    }
}

/// Derives a batch identifier from the run start time
pub fn generate_batch_id(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Main pipeline structure
///
/// The batch id is fixed at construction and threaded into every record.
pub struct Pipeline<F, S> {
    fetcher: F,
    extractor: ContentExtractor,
    sink: S,
    audit: AuditLog,
    batch_id: String,
}

impl<F: PageFetcher, S: ResultSink> Pipeline<F, S> {
    pub fn new(
        fetcher: F,
        extractor: ContentExtractor,
        sink: S,
        audit: AuditLog,
        batch_id: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            sink,
            audit,
            batch_id: batch_id.into(),
        }
    }

    pub fn batch_id(&self) -> &str {
        &self.batch_id
    }

    /// Runs one window
    ///
    /// 1. Computes the range; an empty range is a successful no-op that
    ///    touches neither the CSV store nor the audit log
    /// 2. Fetches and records every URL in order
    /// 3. Appends the batch to the sink (fatal on failure)
    /// 4. Writes the completion entry to the audit log (logged on failure)
    ///
    /// # Returns
    ///
    /// * `Ok(RunReport)` - The window was processed and persisted
    /// * `Err(ScrapeError::Persistence)` - The batch could not be written
    pub async fn run(&mut self, urls: &[String], window: PageWindow) -> Result<RunReport, ScrapeError> {
        let range = window.range(urls.len());

        if range.is_empty() {
            tracing::info!(
                "No URLs to process: start {} is past the end of the list ({} URLs)",
                window.start,
                urls.len()
            );
            return Ok(RunReport {
                batch_id: self.batch_id.clone(),
                range,
                stats: RunStats::new(),
            });
        }

        tracing::info!(
            "Starting batch {}: URLs {} to {} of {}",
            self.batch_id,
            range.start + 1,
            range.end,
            urls.len()
        );

        let (records, stats) = self.collect(urls, window).await;

        self.sink.append(&records)?;
        tracing::info!("Persisted {} records for batch {}", records.len(), self.batch_id);

        if let Err(e) = self.audit.record_window(&range, &self.batch_id) {
            tracing::warn!(
                "Failed to write audit entry to {}: {}",
                self.audit.path().display(),
                e
            );
        }

        Ok(RunReport {
            batch_id: self.batch_id.clone(),
            range,
            stats,
        })
    }

    /// Fetches every URL of the window and builds its record, without persisting
    pub async fn collect(&mut self, urls: &[String], window: PageWindow) -> (Vec<OutputRecord>, RunStats) {
        let range = window.range(urls.len());
        let slice = urls.get(range.clone()).unwrap_or_default();

        let builder = ResultBuilder::new(&self.extractor);
        let mut records = Vec::with_capacity(slice.len());
        let mut stats = RunStats::new();

        for (local_index, url) in slice.iter().enumerate() {
            let row = window.row_number(local_index);
            tracing::debug!("Fetching row {}: {}", row, url);

            let outcome = self.fetcher.fetch(url).await;
            if let FetchOutcome::Failure { kind, message } = &outcome {
                tracing::warn!("Fetch failed for {}: {}: {}", url, kind, message);
            }

            stats.record(&outcome);
            records.push(builder.build(url, row, &self.batch_id, &outcome));

            if (local_index + 1) % 10 == 0 {
                tracing::info!("Progress: {} of {} URLs fetched", local_index + 1, slice.len());
            }
        }

        tracing::info!(
            "Window complete: {} extracted, {} without body, {} fetch errors",
            stats.extracted,
            stats.without_body,
            stats.failed()
        );

        (records, stats)
    }
}

/// Runs one window with the production fetcher, CSV sink and audit log
///
/// # Example
///
/// ```no_run
/// use paged_extract::config::Config;
/// use paged_extract::crawler::{generate_batch_id, run_window};
/// use paged_extract::input::PageWindow;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let urls = vec!["https://example.com/".to_string()];
/// let window = PageWindow::new(0, 50)?;
/// let report = run_window(&config, &urls, window, generate_batch_id(chrono::Utc::now())).await?;
/// println!("Processed {} URLs", report.processed());
/// # Ok(())
/// # }
/// ```
pub async fn run_window(
    config: &Config,
    urls: &[String],
    window: PageWindow,
    batch_id: String,
) -> Result<RunReport, ScrapeError> {
    let fetcher = RateLimitedFetcher::new(&config.fetcher)?;
    let extractor = ContentExtractor::new(&config.extraction);
    let sink = CsvResultSink::new(&config.output.csv_path);
    let audit = AuditLog::new(&config.output.log_path);

    let mut pipeline = Pipeline::new(fetcher, extractor, sink, audit, batch_id);
    pipeline.run(urls, window).await
}
