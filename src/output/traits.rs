//! Output sink traits and error types
//!
//! This module defines the trait interface for result sinks and the errors
//! they report.

use crate::output::record::OutputRecord;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to format output: {0}")]
    Format(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for result sinks
///
/// A sink receives the whole batch of a window at once and must either
/// persist every record or none of them.
pub trait ResultSink {
    /// Appends a batch of records, writing the header first if the store is new
    fn append(&self, records: &[OutputRecord]) -> OutputResult<()>;
}

/// In-memory sink that keeps appended records for inspection
#[derive(Debug, Default)]
pub struct MemorySink {
    records: std::sync::Mutex<Vec<OutputRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything appended so far
    pub fn records(&self) -> Vec<OutputRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}

impl ResultSink for MemorySink {
    fn append(&self, records: &[OutputRecord]) -> OutputResult<()> {
        let mut stored = self
            .records
            .lock()
            .map_err(|e| OutputError::Format(format!("memory sink poisoned: {}", e)))?;
        stored.extend_from_slice(records);
        Ok(())
    }
}
