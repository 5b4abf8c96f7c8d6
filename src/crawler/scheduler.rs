//! Request pacing
//!
//! This module enforces the minimum gap between consecutive requests. The gap
//! is measured from the *completion* of one request to the *start* of the
//! next, so a slow response never adds to the configured delay and a fast one
//! never lets two requests run back to back.

use std::time::{Duration, Instant};

/// Tracks when the previous request finished and delays the next one
#[derive(Debug, Clone)]
pub struct RequestPacer {
    /// Minimum time between the end of one request and the start of the next
    min_gap: Duration,

    /// When the most recent request completed
    last_finished: Option<Instant>,
}

impl RequestPacer {
    /// Creates a pacer with the given minimum gap
    pub fn new(min_gap: Duration) -> Self {
        Self {
            min_gap,
            last_finished: None,
        }
    }

    /// Returns how long the caller must still wait at `now`
    ///
    /// # Returns
    ///
    /// * `None` - A request may start immediately
    /// * `Some(Duration)` - Time remaining until the next request may start
    pub fn time_until_ready(&self, now: Instant) -> Option<Duration> {
        let finished = self.last_finished?;
        let ready_at = finished + self.min_gap;
        if now >= ready_at {
            None
        } else {
            Some(ready_at - now)
        }
    }

    /// Sleeps until the next request is allowed to start
    pub async fn wait_turn(&self) {
        if let Some(wait) = self.time_until_ready(Instant::now()) {
            tracing::trace!("Pacing: waiting {:?} before next request", wait);
            tokio::time::sleep(wait).await;
        }
    }

    /// Records that a request has just completed
    pub fn record_finished(&mut self) {
        self.record_finished_at(Instant::now());
    }

    /// Records that a request completed at `at`
    pub fn record_finished_at(&mut self, at: Instant) {
        self.last_finished = Some(at);
    }
}
