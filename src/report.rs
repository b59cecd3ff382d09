//! Report sink capability.
//!
//! Run summaries go through an injected capability held by the orchestrator
//! rather than a process-wide logger singleton, so hosts can redirect run
//! reports and tests can substitute a capturing sink. [`TracingSink`] is the
//! default and forwards to `tracing`.

/// Destination for the per-run summary and error lines.
///
/// Only the run-level report flows through the sink; diagnostic `tracing`
/// events are emitted regardless.
pub trait ReportSink: Send + Sync {
    /// One informational line per successful run.
    fn info(&self, message: &str);

    /// One error line per failed run.
    fn error(&self, message: &str);
}

/// Default sink: forwards report lines to the `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!("{}", message);
    }
}
