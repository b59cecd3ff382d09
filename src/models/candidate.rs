use serde::{Deserialize, Serialize};

/// One build output or auxiliary asset, as handed over by the host.
///
/// The destination path moved between field names across host versions, so
/// all known spellings are modeled and [`effective_path`](Self::effective_path)
/// tries them in precedence order. Records are host-owned; this crate only
/// reads them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateFile {
    /// Destination path (current hosts).
    #[serde(rename = "destinationPath", default)]
    pub destination_path: Option<String>,

    /// Destination path (older hosts).
    #[serde(rename = "destPath", default)]
    pub dest_path: Option<String>,

    /// Primary path (oldest hosts, and asset records).
    #[serde(default)]
    pub path: Option<String>,
}

impl CandidateFile {
    /// A record carrying only the primary `path` field.
    pub fn from_path(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// A record carrying the `destinationPath` field.
    pub fn from_destination(path: impl Into<String>) -> Self {
        Self {
            destination_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// The record's path under the host's field-precedence rules:
    /// `destinationPath`, then `destPath`, then `path`.
    ///
    /// Returns the raw host value; separator normalization happens in the
    /// path selector.
    pub fn effective_path(&self) -> Option<&str> {
        self.destination_path
            .as_deref()
            .or(self.dest_path.as_deref())
            .or(self.path.as_deref())
    }
}
