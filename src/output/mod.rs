//! Output module for persisting window results
//!
//! This module handles:
//! - Building one output record per URL
//! - Appending record batches to the CSV store
//! - Writing the append-only audit log
//! - Tallying per-window statistics

mod audit_log;
mod csv_output;
mod record;
pub mod stats;
mod traits;

pub use audit_log::{format_entry, window_message, AuditLog};
pub use csv_output::{encode_batch, flatten_newlines, CsvResultSink};
pub use record::{OutputRecord, ResultBuilder, FETCH_ERROR_STATUS, HEADER};
pub use stats::{print_statistics, RunStats};
pub use traits::{MemorySink, OutputError, OutputResult, ResultSink};
