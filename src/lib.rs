// restamp - Post-build token substitution across build pipeline outputs
//
// This is the library crate containing the substitution engine. Host build
// systems wrap `ReplacePlugin` in their own plugin-registration adapter.

pub mod config;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod plugin;
pub mod report;
pub mod services;

// Re-export commonly used types for convenience
pub use models::{CandidateFile, EffectiveConfig, HostConfig, ReplaceOptions};
pub use plugin::ReplacePlugin;
pub use report::{ReportSink, TracingSink};
pub use services::{ReplaceRunner, RunReport, TransformError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
