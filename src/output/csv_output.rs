//! CSV result sink
//!
//! Records are appended to a single CSV file. Every field is double-quoted,
//! embedded quotes are doubled and newlines are collapsed to spaces, so free
//! text can never break row boundaries. The header is written only when the
//! file is absent or empty.
//!
//! Only one process may target a given file at a time: the header check and
//! the append are not guarded against a concurrent writer.

use crate::output::record::{OutputRecord, HEADER};
use crate::output::traits::{OutputError, OutputResult, ResultSink};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Append-only CSV sink
#[derive(Debug, Clone)]
pub struct CsvResultSink {
    path: PathBuf,
}

impl CsvResultSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if the destination is missing or empty
    fn needs_header(&self) -> OutputResult<bool> {
        match std::fs::metadata(&self.path) {
            Ok(metadata) => Ok(metadata.len() == 0),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(true),
            Err(e) => Err(e.into()),
        }
    }
}

impl ResultSink for CsvResultSink {
    /// Encodes the whole batch in memory, then appends it with a single write
    ///
    /// If the write fails part-way the file is truncated back to its previous
    /// length, so a batch is either fully present or absent.
    fn append(&self, records: &[OutputRecord]) -> OutputResult<()> {
        if records.is_empty() {
            return Ok(());
        }

        let buffer = encode_batch(records, self.needs_header()?)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let previous_len = file.metadata()?.len();

        if let Err(e) = file.write_all(&buffer).and_then(|_| file.sync_data()) {
            tracing::error!(
                "Write to {} failed, rolling back to {} bytes",
                self.path.display(),
                previous_len
            );
            if let Err(rollback) = file.set_len(previous_len) {
                tracing::error!("Rollback of {} failed: {}", self.path.display(), rollback);
            }
            return Err(e.into());
        }

        tracing::debug!(
            "Appended {} records ({} bytes) to {}",
            records.len(),
            buffer.len(),
            self.path.display()
        );

        Ok(())
    }
}

/// Encodes records (and optionally the header) as fully quoted CSV
pub fn encode_batch(records: &[OutputRecord], with_header: bool) -> OutputResult<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    if with_header {
        writer.write_record(HEADER)?;
    }

    for record in records {
        writer.write_record(record.fields().iter().map(|field| flatten_newlines(field)))?;
    }

    writer
        .into_inner()
        .map_err(|e| OutputError::Format(e.to_string()))
}

/// Replaces every line break with a single space
pub fn flatten_newlines(value: &str) -> String {
    value.replace("\r\n", " ").replace(['\r', '\n'], " ")
}
