use std::sync::Arc;
use std::time::{Duration, Instant};

use camino::Utf8PathBuf;

use crate::metrics::Metrics;
use crate::models::{CandidateFile, EffectiveConfig};
use crate::report::{ReportSink, TracingSink};
use crate::services::selector;
use crate::services::transform::{self, TransformError};

/// Aggregate outcome of one substitution run.
#[derive(Debug)]
pub struct RunReport {
    /// Normalized target paths, in the order they were selected.
    pub paths: Vec<Utf8PathBuf>,

    /// Wall-clock time from launch to the last transform completing.
    pub elapsed: Duration,

    /// Per-path failures, in target order. Empty means the run succeeded.
    pub failures: Vec<TransformError>,
}

impl RunReport {
    /// Whether every transform completed successfully.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// The first failure, when any transform failed.
    pub fn first_error(&self) -> Option<&TransformError> {
        self.failures.first()
    }
}

/// Orchestrates one substitution run: selects targets, fans out one transform
/// task per path, joins them all, and reports through the injected sink.
///
/// Completion policy is wait-for-all: every spawned transform is awaited to
/// completion, and failures are collected rather than short-circuiting. One
/// path's failure never aborts its siblings.
pub struct ReplaceRunner {
    sink: Arc<dyn ReportSink>,
    metrics: Metrics,
}

impl ReplaceRunner {
    /// A runner reporting through the default [`TracingSink`].
    pub fn new() -> Self {
        Self::with_sink(Arc::new(TracingSink))
    }

    /// A runner reporting through the given sink.
    pub fn with_sink(sink: Arc<dyn ReportSink>) -> Self {
        Self {
            sink,
            metrics: Metrics::new(),
        }
    }

    /// Run counters accumulated across this runner's lifetime.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Execute one run over the concatenated candidate list.
    ///
    /// Transforms share only the read-only config (`Arc`); each task touches
    /// its own path, so no locking is needed between them. Duplicate target
    /// paths are launched as-is and race; the transform's atomic write-back
    /// means the last complete rename wins.
    pub async fn run(&self, records: &[CandidateFile], config: EffectiveConfig) -> RunReport {
        let started = Instant::now();
        let paths = selector::select_paths(records, &config);
        let config = Arc::new(config);

        tracing::debug!("Starting substitution run across {} files", paths.len());

        let mut tasks = Vec::new();
        for path in &paths {
            let path = path.clone();
            let config = Arc::clone(&config);

            tasks.push(tokio::spawn(async move {
                transform::replace_file(&path, &config).await
            }));
        }

        // Join point: wait for every launched transform, success or failure.
        let mut failures = Vec::new();
        for (path, task) in paths.iter().zip(tasks) {
            match task.await {
                Ok(Ok(_)) => {}
                Ok(Err(error)) => {
                    tracing::error!("Transform failed for {}: {}", path, error);
                    failures.push(error);
                }
                Err(join_error) => {
                    // A panicked transform counts as a failed write-back so the
                    // run cannot report success with work missing.
                    tracing::error!("Transform task for {} aborted: {}", path, join_error);
                    failures.push(TransformError::Write {
                        path: path.clone(),
                        source: std::io::Error::other(join_error),
                    });
                }
            }
        }

        let elapsed = started.elapsed();
        self.metrics
            .record_run(paths.len() - failures.len(), failures.len(), elapsed);

        if config.log {
            if let Some(first) = failures.first() {
                self.sink.error(&format!(
                    "replace failed for {} of {} files: {}",
                    failures.len(),
                    paths.len(),
                    first
                ));
            } else {
                self.sink.info(&format!(
                    "replaced mappings in {} files, replaced in {} ms",
                    paths.len(),
                    elapsed.as_millis()
                ));
            }
        }

        RunReport {
            paths,
            elapsed,
            failures,
        }
    }
}

impl Default for ReplaceRunner {
    fn default() -> Self {
        Self::new()
    }
}
