//! Configuration resolution: raw host options layered over documented defaults.
//!
//! [`resolve`] is total: it never fails, whatever the host supplied. Absent or
//! malformed input simply resolves to all defaults. The built-in `date` and
//! `timestamp` mappings are captured from a single wall-clock read at
//! resolution time, so every file transformed in the run observes identical
//! values.

use chrono::{SecondsFormat, Utc};
use indexmap::IndexMap;

use crate::models::{
    DEFAULT_REPLACE_PREFIX, DEFAULT_REPLACE_SUFFIX, EffectiveConfig, ReplaceOptions, TextEncoding,
};

/// Resolve an [`EffectiveConfig`] for one run.
///
/// Layering, lowest to highest precedence: documented defaults, the plugin's
/// stored base options, per-call overrides. Scalar options are whole-value
/// precedence; `mappings` merge additively so user keys augment the built-in
/// `date`/`timestamp` pair instead of replacing it (a user-supplied `date`
/// overrides only that key).
///
/// Inputs are borrowed and never mutated.
pub fn resolve(
    base: Option<&ReplaceOptions>,
    overrides: Option<&ReplaceOptions>,
) -> EffectiveConfig {
    // One wall-clock read; both built-ins derive from it.
    let now = Utc::now();

    let mut mappings: IndexMap<String, String> = IndexMap::new();
    mappings.insert(
        "date".to_string(),
        now.to_rfc3339_opts(SecondsFormat::Millis, true),
    );
    mappings.insert("timestamp".to_string(), now.timestamp().to_string());

    let mut config = EffectiveConfig {
        encoding: TextEncoding::Utf8,
        mappings,
        paths: Vec::new(),
        replace_prefix: DEFAULT_REPLACE_PREFIX.to_string(),
        replace_suffix: DEFAULT_REPLACE_SUFFIX.to_string(),
        log: true,
    };

    for layer in [base, overrides].into_iter().flatten() {
        apply_layer(&mut config, layer);
    }

    config
}

/// Merge one raw options layer into the partially resolved config.
fn apply_layer(config: &mut EffectiveConfig, layer: &ReplaceOptions) {
    if let Some(encoding) = layer.encoding {
        config.encoding = encoding;
    }

    if let Some(mappings) = &layer.mappings {
        for (key, value) in mappings {
            config.mappings.insert(key.clone(), value.to_replacement());
        }
    }

    if let Some(paths) = &layer.paths {
        config.paths = paths
            .iter()
            .map(|p| crate::services::selector::normalize_separators(p))
            .collect();
    }

    if let Some(prefix) = &layer.replace_prefix {
        config.replace_prefix = prefix.clone();
    }

    if let Some(suffix) = &layer.replace_suffix {
        config.replace_suffix = suffix.clone();
    }

    if let Some(log) = layer.log {
        config.log = log;
    }
}
