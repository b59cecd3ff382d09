use std::io;
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};

use camino::{Utf8Path, Utf8PathBuf};
use regex::{NoExpand, Regex};
use thiserror::Error;
use tokio::fs;

use crate::models::{EffectiveConfig, TextEncoding};

/// Sequence for unique temp file names; racing transforms on a duplicate
/// target path must never share a temp file.
static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Errors from a single-file transform, attributed to that file only.
#[derive(Error, Debug)]
pub enum TransformError {
    /// The target could not be opened or read (missing, permission denied,
    /// not a regular file, or invalid bytes under strict UTF-8).
    #[error("failed to read {path}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    /// The write-back failed after a successful read. The target still holds
    /// either its old or its new complete content, never a torn write.
    #[error("failed to write {path}")]
    Write {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TransformError {
    /// The path this failure is attributed to.
    pub fn path(&self) -> &Utf8Path {
        match self {
            TransformError::Read { path, .. } | TransformError::Write { path, .. } => path,
        }
    }
}

/// Apply every mapping to the text, in mapping iteration order.
///
/// Each key's token (`prefix + key + suffix`) is matched as an escaped
/// literal and all non-overlapping occurrences are replaced. The replacement
/// is literal too ([`NoExpand`]): a value containing `$` never triggers
/// capture-group expansion. Later keys operate on the already-modified text.
pub fn apply_mappings(text: &str, config: &EffectiveConfig) -> String {
    let mut data = text.to_string();

    for (key, value) in &config.mappings {
        let pattern = regex::escape(&config.token_for(key));
        let search = Regex::new(&pattern).expect("escaped literal is a valid pattern");
        data = search.replace_all(&data, NoExpand(value.as_str())).into_owned();
    }

    data
}

/// Transform one file in place: read per the configured encoding, substitute
/// every mapping, write the result back atomically.
///
/// Returns the new contents on success. No retry is performed; the caller
/// owns failure policy.
pub async fn replace_file(
    path: &Utf8Path,
    config: &EffectiveConfig,
) -> Result<String, TransformError> {
    let text = read_text(path, config.encoding)
        .await
        .map_err(|source| TransformError::Read {
            path: path.to_owned(),
            source,
        })?;

    let replaced = apply_mappings(&text, config);
    write_text_atomic(path, &replaced).await?;

    tracing::debug!("Replaced mappings in {}", path);
    Ok(replaced)
}

async fn read_text(path: &Utf8Path, encoding: TextEncoding) -> io::Result<String> {
    match encoding {
        TextEncoding::Utf8 => fs::read_to_string(path).await,
        TextEncoding::Utf8Lossy => {
            let bytes = fs::read(path).await?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}

/// Write the full text to a uniquely named temp sibling, then rename over the
/// target. A failed write leaves the target untouched.
async fn write_text_atomic(path: &Utf8Path, text: &str) -> Result<(), TransformError> {
    let temp = temp_path_for(path);

    if let Err(source) = fs::write(&temp, text).await {
        let _ = fs::remove_file(&temp).await;
        return Err(TransformError::Write {
            path: path.to_owned(),
            source,
        });
    }

    if let Err(source) = fs::rename(&temp, path).await {
        let _ = fs::remove_file(&temp).await;
        return Err(TransformError::Write {
            path: path.to_owned(),
            source,
        });
    }

    Ok(())
}

/// A temp sibling in the target's directory, so the rename stays on one
/// filesystem. Unique per process and per transform.
fn temp_path_for(path: &Utf8Path) -> Utf8PathBuf {
    let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
    let file_name = path.file_name().unwrap_or("output");
    path.with_file_name(format!(".{}.{}.{}.tmp", file_name, process::id(), seq))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::resolve;
    use crate::models::{MappingValue, ReplaceOptions};
    use indexmap::indexmap;
    use std::fs as std_fs;
    use tempfile::TempDir;

    fn version_config() -> EffectiveConfig {
        let options = ReplaceOptions {
            mappings: Some(indexmap! {
                "version".to_string() => MappingValue::from("0.0.1"),
            }),
            replace_prefix: Some("{?".to_string()),
            replace_suffix: Some("?}".to_string()),
            ..ReplaceOptions::default()
        };
        resolve(Some(&options), None)
    }

    fn write_fixture(dir: &TempDir, name: &str, contents: &str) -> Utf8PathBuf {
        let path = Utf8PathBuf::try_from(dir.path().join(name)).unwrap();
        std_fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_replace_default_date_token() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(&dir, "date.txt", "{!date!}");
        let config = resolve(None, None);

        let replaced = tokio_test::block_on(replace_file(&path, &config)).unwrap();

        let expected = config.mappings.get("date").unwrap();
        assert_eq!(&replaced, expected);
        assert_eq!(&std_fs::read_to_string(&path).unwrap(), expected);
    }

    #[test]
    fn test_second_run_with_same_config_is_a_noop() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(&dir, "date.txt", "{!date!}");
        let config = resolve(None, None);

        let first = tokio_test::block_on(replace_file(&path, &config)).unwrap();
        let second = tokio_test::block_on(replace_file(&path, &config)).unwrap();

        // The token is gone after the first pass, so nothing matches again.
        assert_eq!(first, second);
        assert_eq!(std_fs::read_to_string(&path).unwrap(), first);
    }

    #[test]
    fn test_replace_custom_mapping_in_json() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(&dir, "manifest.json", r#"{"version": "{?version?}"}"#);

        let replaced =
            tokio_test::block_on(replace_file(&path, &version_config())).unwrap();

        assert_eq!(replaced, r#"{"version": "0.0.1"}"#);
    }

    #[test]
    fn test_replace_bare_token() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(&dir, "version.txt", "{?version?}");

        let replaced =
            tokio_test::block_on(replace_file(&path, &version_config())).unwrap();

        assert_eq!(replaced, "0.0.1");
    }

    #[test]
    fn test_all_occurrences_replaced() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(&dir, "multi.txt", "{?version?} and {?version?}");

        let replaced =
            tokio_test::block_on(replace_file(&path, &version_config())).unwrap();

        assert_eq!(replaced, "0.0.1 and 0.0.1");
    }

    #[test]
    fn test_unknown_key_left_untouched() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(&dir, "unknown.txt", "{!nope!} {!date!}");
        let config = resolve(None, None);

        let replaced = tokio_test::block_on(replace_file(&path, &config)).unwrap();

        assert!(replaced.starts_with("{!nope!} "));
        assert!(!replaced.contains("{!date!}"));
    }

    #[test]
    fn test_nonexistent_path_fails_read_and_does_not_create_file() {
        let dir = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(dir.path().join("missing.txt")).unwrap();
        let config = resolve(None, None);

        let error = tokio_test::block_on(replace_file(&path, &config)).unwrap_err();

        assert!(matches!(error, TransformError::Read { .. }));
        assert_eq!(error.path(), path.as_path());
        assert!(!path.as_std_path().exists());
    }

    #[test]
    fn test_directory_path_fails_read() {
        let dir = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
        let config = resolve(None, None);

        let error = tokio_test::block_on(replace_file(&path, &config)).unwrap_err();

        assert!(matches!(error, TransformError::Read { .. }));
    }

    #[test]
    fn test_strict_utf8_rejects_invalid_bytes() {
        let dir = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(dir.path().join("latin1.txt")).unwrap();
        std_fs::write(&path, [b'v', 0xE9, b'r']).unwrap();
        let config = resolve(None, None);

        let error = tokio_test::block_on(replace_file(&path, &config)).unwrap_err();
        assert!(matches!(error, TransformError::Read { .. }));
    }

    #[test]
    fn test_lossy_utf8_reads_invalid_bytes() {
        let dir = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(dir.path().join("latin1.txt")).unwrap();
        std_fs::write(&path, [b'v', 0xE9, b'r']).unwrap();

        let options = ReplaceOptions {
            encoding: Some(TextEncoding::Utf8Lossy),
            ..ReplaceOptions::default()
        };
        let config = resolve(Some(&options), None);

        let replaced = tokio_test::block_on(replace_file(&path, &config)).unwrap();
        assert_eq!(replaced, "v\u{FFFD}r");
    }

    #[test]
    fn test_replacement_value_is_literal_no_expansion() {
        let options = ReplaceOptions {
            mappings: Some(indexmap! {
                "version".to_string() => MappingValue::from("$1 ${name} $$"),
            }),
            ..ReplaceOptions::default()
        };
        let config = resolve(Some(&options), None);

        let replaced = apply_mappings("v={!version!}", &config);

        assert_eq!(replaced, "v=$1 ${name} $$");
    }

    #[test]
    fn test_earlier_keys_substitute_first() {
        let options = ReplaceOptions {
            mappings: Some(indexmap! {
                "outer".to_string() => MappingValue::from("{!inner!}"),
                "inner".to_string() => MappingValue::from("X"),
            }),
            ..ReplaceOptions::default()
        };
        let config = resolve(Some(&options), None);

        // `outer` produces an `inner` token which the later key then rewrites.
        assert_eq!(apply_mappings("{!outer!}", &config), "X");
    }

    #[test]
    fn test_temp_paths_are_unique() {
        let path = Utf8Path::new("test_files/version.txt");
        assert_ne!(temp_path_for(path), temp_path_for(path));
    }

    mod literal_substitution {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // Delimiters full of regex metacharacters must still match as
            // literals, and values full of `$` must be copied verbatim.
            #[test]
            fn prop_metacharacter_delimiters_substitute_literally(
                prefix in r"[\(\)\[\]\{\}\.\*\+\?\^\$\\|]{1,4}",
                suffix in r"[\(\)\[\]\{\}\.\*\+\?\^\$\\|]{1,4}",
                value in r"[a-zA-Z0-9\$\{\}]{0,12}",
            ) {
                let options = ReplaceOptions {
                    mappings: Some(indexmap! {
                        "key".to_string() => MappingValue::String(value.clone()),
                    }),
                    replace_prefix: Some(prefix.clone()),
                    replace_suffix: Some(suffix.clone()),
                    ..ReplaceOptions::default()
                };
                let config = resolve(Some(&options), None);

                let text = format!("A{}key{}B", prefix, suffix);
                prop_assert_eq!(apply_mappings(&text, &config), format!("A{}B", value));
            }
        }
    }
}
