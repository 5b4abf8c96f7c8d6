//! Page window arithmetic
//!
//! A window is `[start, start + size)` clamped to the URL list. Row numbers are
//! derived from absolute list positions so they stay stable across runs that
//! use different window sizes.

use crate::ScrapeError;
use std::ops::Range;

/// The slice of the URL list processed by one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Zero-based index of the first URL
    pub start: usize,

    /// Maximum number of URLs in the window (always >= 1)
    pub size: usize,
}

impl PageWindow {
    /// Creates a window, rejecting a zero size before any I/O happens
    pub fn new(start: usize, size: usize) -> Result<Self, ScrapeError> {
        if size == 0 {
            return Err(ScrapeError::InvalidArgument(
                "window size must be a positive integer".to_string(),
            ));
        }
        Ok(Self { start, size })
    }

    /// Creates a window from signed values, as supplied by external callers
    pub fn from_signed(start: i64, size: i64) -> Result<Self, ScrapeError> {
        let start = usize::try_from(start).map_err(|_| {
            ScrapeError::InvalidArgument(format!(
                "window start must be a non-negative integer, got {}",
                start
            ))
        })?;
        let size = usize::try_from(size).map_err(|_| {
            ScrapeError::InvalidArgument(format!(
                "window size must be a positive integer, got {}",
                size
            ))
        })?;
        Self::new(start, size)
    }

    /// Returns the index range to process within a list of `total` URLs
    ///
    /// An empty range means the window lies past the end of the list, which
    /// callers treat as a successful no-op.
    pub fn range(&self, total: usize) -> Range<usize> {
        if self.start >= total {
            return total..total;
        }
        let end = self.start.saturating_add(self.size).min(total);
        self.start..end
    }

    /// Global, 1-based row number of the `local_index`-th URL in this window
    pub fn row_number(&self, local_index: usize) -> usize {
        self.start + local_index + 1
    }
}
