use camino::Utf8PathBuf;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Default placeholder delimiters wrapped around a mapping key.
pub const DEFAULT_REPLACE_PREFIX: &str = "{!";
pub const DEFAULT_REPLACE_SUFFIX: &str = "!}";

/// A mapping value as supplied by the host configuration.
///
/// Hosts write both `version: "1.2.3"` and `build: 42`; the transform only
/// ever sees the stringified form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MappingValue {
    String(String),
    Integer(i64),
    Float(f64),
}

impl MappingValue {
    /// Stringify for literal substitution into file contents.
    pub fn to_replacement(&self) -> String {
        match self {
            MappingValue::String(s) => s.clone(),
            MappingValue::Integer(n) => n.to_string(),
            MappingValue::Float(f) => f.to_string(),
        }
    }
}

impl From<&str> for MappingValue {
    fn from(s: &str) -> Self {
        MappingValue::String(s.to_string())
    }
}

impl From<i64> for MappingValue {
    fn from(n: i64) -> Self {
        MappingValue::Integer(n)
    }
}

/// Text encoding used for reading and writing target files.
///
/// Unknown encoding names in host input fall back to [`TextEncoding::Utf8`];
/// options are validated only by defaulting, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextEncoding {
    /// Strict UTF-8. Invalid bytes fail the read.
    #[default]
    Utf8,
    /// UTF-8 with invalid sequences replaced by U+FFFD on read.
    Utf8Lossy,
}

impl TextEncoding {
    /// Resolve an encoding name from host input.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => TextEncoding::Utf8,
            "utf8-lossy" | "utf8lossy" => TextEncoding::Utf8Lossy,
            other => {
                tracing::warn!("Unknown encoding '{}', falling back to utf8", other);
                TextEncoding::Utf8
            }
        }
    }
}

impl<'de> Deserialize<'de> for TextEncoding {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(TextEncoding::from_name(&name))
    }
}

/// The raw `plugins.replace` subsection exactly as the host supplies it.
///
/// Every field is optional; [`crate::config::resolve`] layers these over the
/// documented defaults. Field names use the host's camelCase spelling.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplaceOptions {
    #[serde(default)]
    pub encoding: Option<TextEncoding>,

    #[serde(default)]
    pub mappings: Option<IndexMap<String, MappingValue>>,

    #[serde(default)]
    pub paths: Option<Vec<String>>,

    #[serde(rename = "replacePrefix", default)]
    pub replace_prefix: Option<String>,

    #[serde(rename = "replaceSuffix", default)]
    pub replace_suffix: Option<String>,

    #[serde(default)]
    pub log: Option<bool>,
}

/// The raw nested host configuration. Only `plugins.replace` is read;
/// everything else the host nests alongside is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostConfig {
    #[serde(default)]
    pub plugins: PluginsSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PluginsSection {
    #[serde(default)]
    pub replace: Option<ReplaceOptions>,
}

impl HostConfig {
    /// Parse host configuration from a YAML document.
    ///
    /// Malformed input degrades to the empty configuration; resolution must
    /// never fail on host input.
    pub fn from_yaml_str(input: &str) -> Self {
        match serde_yaml_ng::from_str(input) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Malformed host configuration, using defaults: {}", e);
                HostConfig::default()
            }
        }
    }

    /// The plugin-specific subsection, if the host provided one.
    pub fn replace_options(&self) -> Option<&ReplaceOptions> {
        self.plugins.replace.as_ref()
    }
}

/// Resolved, immutable settings for one substitution run.
///
/// Produced once per run by [`crate::config::resolve`] and shared read-only
/// by every concurrent transform, so all files in a run observe the same
/// mappings, including the same captured `date`/`timestamp` values.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveConfig {
    /// Encoding for both the read and the write-back.
    pub encoding: TextEncoding,

    /// Ordered key → stringified replacement value. Iteration order is the
    /// substitution order.
    pub mappings: IndexMap<String, String>,

    /// Explicit allow-list of target paths; empty means all candidates.
    pub paths: Vec<Utf8PathBuf>,

    /// Literal delimiter placed before a mapping key to form a token.
    pub replace_prefix: String,

    /// Literal delimiter placed after a mapping key to form a token.
    pub replace_suffix: String,

    /// Whether the run emits a summary line to the report sink.
    pub log: bool,
}

impl EffectiveConfig {
    /// The placeholder token for a mapping key, before regex escaping.
    pub fn token_for(&self, key: &str) -> String {
        format!("{}{}{}", self.replace_prefix, key, self.replace_suffix)
    }
}
