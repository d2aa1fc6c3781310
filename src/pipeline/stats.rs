//! Run statistics shared by every stage.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;

/// Counters updated concurrently by the download and store stages.
///
/// `successful + failed <= total` holds at every instant, and becomes an
/// equality once every stage has drained.
#[derive(Debug, Default)]
pub struct RunStats {
    total: AtomicU64,
    successful: AtomicU64,
    failed: AtomicU64,
    persist_failed: AtomicU64,
    fetch_micros: AtomicU64,
}

impl RunStats {
    /// Creates a stats tracker with zero counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of URLs taken off the input queue.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total.load(Ordering::SeqCst)
    }

    /// Number of items fetched and persisted.
    #[must_use]
    pub fn successful(&self) -> u64 {
        self.successful.load(Ordering::SeqCst)
    }

    /// Number of items that failed at fetch or persist time.
    #[must_use]
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::SeqCst)
    }

    /// Number of failed items whose fetch succeeded but persist did not.
    #[must_use]
    pub fn persist_failed(&self) -> u64 {
        self.persist_failed.load(Ordering::SeqCst)
    }

    /// Cumulative wall-clock duration of fetches handed to the store stage.
    #[must_use]
    pub fn cumulative_fetch_duration(&self) -> Duration {
        Duration::from_micros(self.fetch_micros.load(Ordering::SeqCst))
    }

    pub(crate) fn record_url_seen(&self) {
        self.total.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn record_success(&self) {
        self.successful.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn record_fetch_failure(&self) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn record_persist_failure(&self) {
        self.persist_failed.fetch_add(1, Ordering::SeqCst);
        self.failed.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn record_fetch_duration(&self, elapsed: Duration) {
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self.fetch_micros.fetch_add(micros, Ordering::SeqCst);
    }

    /// Takes a point-in-time snapshot for reporting.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        RunSummary::from_counts(
            self.total(),
            self.successful(),
            self.failed(),
            self.persist_failed(),
            self.cumulative_fetch_duration(),
        )
    }
}

/// Final figures reported at the end of a run.
///
/// Rates and the average are `None` when no URL was seen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// URLs taken off the input queue.
    pub total: u64,
    /// Items fetched and persisted.
    pub successful: u64,
    /// Items that failed at fetch or persist time.
    pub failed: u64,
    /// Subset of `failed` whose fetch succeeded but persist did not.
    pub persist_failed: u64,
    /// Summed duration of delivered fetches, in milliseconds.
    pub cumulative_fetch_ms: f64,
    /// `successful / total * 100`.
    pub success_percentage: Option<f64>,
    /// `failed / total * 100`.
    pub failure_percentage: Option<f64>,
    /// Cumulative fetch duration divided by `total`.
    pub average_fetch_ms: Option<f64>,
}

impl RunSummary {
    /// Builds a summary from raw counts.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_counts(
        total: u64,
        successful: u64,
        failed: u64,
        persist_failed: u64,
        cumulative_fetch: Duration,
    ) -> Self {
        let cumulative_fetch_ms = cumulative_fetch.as_secs_f64() * 1000.0;
        let per_item = |value: f64| (total > 0).then(|| value / total as f64);

        Self {
            total,
            successful,
            failed,
            persist_failed,
            cumulative_fetch_ms,
            success_percentage: per_item(successful as f64 * 100.0),
            failure_percentage: per_item(failed as f64 * 100.0),
            average_fetch_ms: per_item(cumulative_fetch_ms),
        }
    }

    /// Returns true when every URL seen has a recorded outcome.
    #[must_use]
    pub fn is_reconciled(&self) -> bool {
        self.successful + self.failed == self.total
    }
}
