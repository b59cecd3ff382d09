//! Data models for the restamp plugin.
//!
//! This module contains the core data structures passed between components:
//! - [`HostConfig`] / [`ReplaceOptions`]: The raw host configuration with its optional
//!   `plugins.replace` subsection, exactly as supplied (all fields optional)
//! - [`EffectiveConfig`]: Resolved, immutable settings for one substitution run,
//!   produced by [`crate::config::resolve`]
//! - [`CandidateFile`]: A duck-typed build-output record whose destination path may
//!   live under one of several host field names
//! - [`MappingValue`] / [`TextEncoding`]: Value and encoding types for the options
//!
//! # Architecture Note
//!
//! Raw config types derive `Serialize`/`Deserialize` so hosts can hand over YAML
//! directly; mappings use `IndexMap` because their iteration order is the
//! substitution order. `EffectiveConfig` is computed once per run and shared
//! read-only across every concurrent transform.

pub mod candidate;
pub mod config;

pub use candidate::CandidateFile;
pub use config::{
    DEFAULT_REPLACE_PREFIX, DEFAULT_REPLACE_SUFFIX, EffectiveConfig, HostConfig, MappingValue,
    ReplaceOptions, TextEncoding,
};
