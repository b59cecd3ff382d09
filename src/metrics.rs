// Run metrics
//
// Lightweight counters for substitution runs, shared lock-free across tasks

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Counters accumulated across the substitution runs of one runner.
///
/// Uses atomic operations for thread-safe tracking without locks; transforms
/// run concurrently and record through the orchestrator at join time.
#[derive(Debug)]
pub struct Metrics {
    /// Number of completed runs
    runs: AtomicUsize,

    /// Files successfully transformed across all runs
    files_replaced: AtomicUsize,

    /// Files that failed to transform across all runs
    files_failed: AtomicUsize,

    /// Cumulative run time in milliseconds
    total_run_time_ms: AtomicU64,

    /// Runner creation time
    start_time: Instant,
}

impl Metrics {
    /// Create a new Metrics instance
    pub fn new() -> Self {
        Self {
            runs: AtomicUsize::new(0),
            files_replaced: AtomicUsize::new(0),
            files_failed: AtomicUsize::new(0),
            total_run_time_ms: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record one completed run
    pub fn record_run(&self, replaced: usize, failed: usize, elapsed: Duration) {
        self.runs.fetch_add(1, Ordering::Relaxed);
        self.files_replaced.fetch_add(replaced, Ordering::Relaxed);
        self.files_failed.fetch_add(failed, Ordering::Relaxed);
        self.total_run_time_ms
            .fetch_add(elapsed.as_millis() as u64, Ordering::Relaxed);
    }

    /// Number of completed runs
    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::Relaxed)
    }

    /// Files successfully transformed across all runs
    pub fn files_replaced(&self) -> usize {
        self.files_replaced.load(Ordering::Relaxed)
    }

    /// Files that failed to transform across all runs
    pub fn files_failed(&self) -> usize {
        self.files_failed.load(Ordering::Relaxed)
    }

    /// Time since the runner was created
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Average run time in milliseconds
    pub fn avg_run_time_ms(&self) -> f64 {
        let total = self.total_run_time_ms.load(Ordering::Relaxed);
        let count = self.runs();
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }

    /// Log a metrics summary
    pub fn log_summary(&self) {
        tracing::info!(
            "Runs: {} ({:.2}ms avg), files: {} replaced, {} failed, uptime {:.0}s",
            self.runs(),
            self.avg_run_time_ms(),
            self.files_replaced(),
            self.files_failed(),
            self.uptime().as_secs_f64()
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
