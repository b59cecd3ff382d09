//! Services module - Pure substitution logic, framework-agnostic.
//!
//! This module contains the whole substitution engine. The services have no
//! dependency on any particular build tool; hosts adapt their plugin hook to
//! [`crate::plugin::ReplacePlugin`], which drives these services.
//!
//! # Components
//!
//! - [`selector`]: Derives and filters target paths from candidate records.
//!   Normalizes backslash separators, applies the `paths` allow-list as a
//!   stable filter, and deliberately does not deduplicate.
//!
//! - [`transform`]: The per-file read/replace/write sequence. Each mapping
//!   key's token is matched as an escaped literal and replaced without
//!   pattern semantics; the write-back goes through a temp sibling and a
//!   rename so a failed write never leaves a partially substituted file.
//!
//! - [`runner`]: The orchestrator. Fans out one tokio task per target path,
//!   waits for all of them (failures are isolated per path and collected),
//!   and emits the run summary or error line through the injected
//!   [`crate::report::ReportSink`].
//!
//! # Design Philosophy
//!
//! - **Pure**: No side effects beyond the target-file I/O itself
//! - **Async**: All file operations use tokio for concurrent fan-out
//! - **Testable**: No hidden dependencies, all inputs are explicit parameters

pub mod runner;
pub mod selector;
pub mod transform;

pub use runner::{ReplaceRunner, RunReport};
pub use selector::select_paths;
pub use transform::{TransformError, replace_file};
