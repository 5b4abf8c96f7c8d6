//! Per-window run statistics
//!
//! This module tallies how the URLs of a window fared and displays the
//! result once the window is done.

use crate::crawler::FetchOutcome;
use std::collections::HashMap;

/// Outcome counts for one window
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Records produced (always equals the number of URLs in the window)
    pub total: usize,

    /// Successful HTML responses that went through extraction
    pub extracted: usize,

    /// Responses without a body (non-2xx or non-HTML)
    pub without_body: usize,

    /// Responses with a non-2xx status
    pub http_errors: usize,

    /// Transport failures, by error label
    pub fetch_errors: HashMap<String, usize>,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tallies one fetch outcome
    pub fn record(&mut self, outcome: &FetchOutcome) {
        self.total += 1;
        match outcome {
            FetchOutcome::Success {
                status_code, body, ..
            } => {
                if body.is_some() {
                    self.extracted += 1;
                } else {
                    self.without_body += 1;
                }
                if !(200..300).contains(status_code) {
                    self.http_errors += 1;
                }
            }
            FetchOutcome::Failure { kind, .. } => {
                *self.fetch_errors.entry(kind.to_string()).or_insert(0) += 1;
            }
        }
    }

    /// Total transport failures
    pub fn failed(&self) -> usize {
        self.fetch_errors.values().sum()
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &RunStats) {
    println!("=== Window Statistics ===\n");
    println!("  URLs processed: {}", stats.total);
    println!("  Extracted (HTML): {}", stats.extracted);
    println!("  No body (non-HTML or non-2xx): {}", stats.without_body);
    println!("  Non-2xx responses: {}", stats.http_errors);
    println!("  Fetch errors: {}", stats.failed());

    let mut errors: Vec<_> = stats.fetch_errors.iter().collect();
    errors.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (kind, count) in errors {
        println!("    {}: {}", kind, count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::FetchErrorKind;

    fn success(status_code: u16, body: Option<&str>) -> FetchOutcome {
        FetchOutcome::Success {
            final_url: "https://example.com/".to_string(),
            status_code,
            redirected: false,
            content_type: "text/html".to_string(),
            body: body.map(str::to_string),
        }
    }

    #[test]
    fn test_record_tallies() {
        let mut stats = RunStats::new();
        stats.record(&success(200, Some("<html></html>")));
        stats.record(&success(404, None));
        stats.record(&success(200, None));
        stats.record(&FetchOutcome::Failure {
            kind: FetchErrorKind::Timeout,
            message: "slow".to_string(),
        });
        stats.record(&FetchOutcome::Failure {
            kind: FetchErrorKind::Timeout,
            message: "slow".to_string(),
        });

        assert_eq!(stats.total, 5);
        assert_eq!(stats.extracted, 1);
        assert_eq!(stats.without_body, 2);
        assert_eq!(stats.http_errors, 1);
        assert_eq!(stats.failed(), 2);
        assert_eq!(stats.fetch_errors.get("Timeout"), Some(&2));
    }

    #[test]
    fn test_empty_stats() {
        let stats = RunStats::new();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.failed(), 0);
    }
}
