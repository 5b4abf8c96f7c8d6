//! Append-only audit log
//!
//! One human-readable line per completed window (or fatal failure), in the
//! form `"{timestamp}: {message}"` with an RFC 3339 UTC timestamp. The log is
//! independent of the CSV store.

use crate::output::traits::OutputResult;
use chrono::{SecondsFormat, Utc};
use std::fs::OpenOptions;
use std::io::Write;
use std::ops::Range;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one timestamped line
    pub fn append(&self, message: &str) -> OutputResult<()> {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(format_entry(&timestamp, message).as_bytes())?;
        Ok(())
    }

    /// Records a completed window
    pub fn record_window(&self, range: &Range<usize>, batch_id: &str) -> OutputResult<()> {
        self.append(&window_message(range, batch_id))
    }
}

/// Formats a single log line, newline included
pub fn format_entry(timestamp: &str, message: &str) -> String {
    // Keep one entry per line even if the message spans several
    let message = message.replace(['\r', '\n'], " ");
    format!("{}: {}\n", timestamp, message)
}

/// Completion message for a processed window, with 1-based row bounds
pub fn window_message(range: &Range<usize>, batch_id: &str) -> String {
    format!(
        "Processed URLs {} to {} ({} URLs), batch {}",
        range.start + 1,
        range.end,
        range.len(),
        batch_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_format_entry() {
        assert_eq!(
            format_entry("2024-05-01T10:00:00.000Z", "done"),
            "2024-05-01T10:00:00.000Z: done\n"
        );
    }

    #[test]
    fn test_format_entry_keeps_single_line() {
        assert_eq!(format_entry("t", "a\nb"), "t: a b\n");
    }

    #[test]
    fn test_window_message() {
        assert_eq!(
            window_message(&(50..60), "b1"),
            "Processed URLs 51 to 60 (10 URLs), batch b1"
        );
    }

    #[test]
    fn test_append_accumulates_lines() {
        let dir = TempDir::new().unwrap();
        let log = AuditLog::new(dir.path().join("run.log"));

        log.append("first").unwrap();
        log.record_window(&(0..2), "b").unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(": first"));
        assert!(lines[1].ends_with(": Processed URLs 1 to 2 (2 URLs), batch b"));

        let timestamp = lines[0].split(": ").next().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    }
}
