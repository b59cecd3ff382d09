use std::sync::Arc;

use anyhow::{Result, anyhow};

use crate::config;
use crate::models::{CandidateFile, HostConfig, ReplaceOptions};
use crate::report::ReportSink;
use crate::services::runner::{ReplaceRunner, RunReport};

/// The plugin facade a host build system talks to.
///
/// Construction snapshots the host's raw `plugins.replace` subsection; each
/// [`on_build`](Self::on_build) invocation resolves a fresh
/// [`crate::models::EffectiveConfig`] from it (so the built-in `date` and
/// `timestamp` mappings are captured per run, consistently across that run's
/// files) and executes one substitution run.
pub struct ReplacePlugin {
    base: Option<ReplaceOptions>,
    runner: ReplaceRunner,
}

impl ReplacePlugin {
    /// Create a plugin from the host configuration, reporting through the
    /// default tracing sink.
    pub fn new(host: Option<&HostConfig>) -> Self {
        Self {
            base: host.and_then(|h| h.replace_options().cloned()),
            runner: ReplaceRunner::new(),
        }
    }

    /// Create a plugin reporting through the given sink.
    pub fn with_sink(host: Option<&HostConfig>, sink: Arc<dyn ReportSink>) -> Self {
        Self {
            base: host.and_then(|h| h.replace_options().cloned()),
            runner: ReplaceRunner::with_sink(sink),
        }
    }

    /// The build-completed hook: one substitution run over the produced files
    /// and auxiliary assets, concatenated in host order.
    ///
    /// Returns `Err` when any file failed (first failure, with its path in
    /// the chain); sibling transforms still ran to completion either way.
    pub async fn on_build(
        &self,
        files: &[CandidateFile],
        assets: &[CandidateFile],
    ) -> Result<RunReport> {
        self.on_build_with(files, assets, None).await
    }

    /// [`on_build`](Self::on_build) with per-call option overrides layered
    /// over the stored base options.
    pub async fn on_build_with(
        &self,
        files: &[CandidateFile],
        assets: &[CandidateFile],
        overrides: Option<&ReplaceOptions>,
    ) -> Result<RunReport> {
        let effective = config::resolve(self.base.as_ref(), overrides);

        let mut records = Vec::with_capacity(files.len() + assets.len());
        records.extend_from_slice(files);
        records.extend_from_slice(assets);

        let report = self.runner.run(&records, effective).await;

        match report.first_error() {
            None => Ok(report),
            Some(first) => Err(anyhow!("{first}")
                .context(format!("replace failed for {} file(s)", report.failures.len()))),
        }
    }

    /// Counters accumulated across this plugin's runs.
    pub fn metrics(&self) -> &crate::metrics::Metrics {
        self.runner.metrics()
    }
}
