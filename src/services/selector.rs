use camino::Utf8PathBuf;

use crate::models::{CandidateFile, EffectiveConfig};

/// Normalize host path separators: backslashes become forward slashes,
/// whatever the host platform's convention.
pub fn normalize_separators(path: &str) -> Utf8PathBuf {
    Utf8PathBuf::from(path.replace('\\', "/"))
}

/// Select the target paths for one run.
///
/// Candidates are processed in host order (build outputs first, then assets,
/// as concatenated by the caller). Each record's path is derived via
/// [`CandidateFile::effective_path`], normalized, then kept when the
/// allow-list is empty or contains it (exact, case-sensitive match).
///
/// The filter is stable: output preserves candidate order, not allow-list
/// order. Duplicate candidate paths are not deduplicated; each matching
/// record yields one entry, and duplicate targets race at transform time
/// (last complete write wins).
pub fn select_paths(records: &[CandidateFile], config: &EffectiveConfig) -> Vec<Utf8PathBuf> {
    records
        .iter()
        .filter_map(|record| match record.effective_path() {
            Some(path) => Some(normalize_separators(path)),
            None => {
                tracing::warn!("Candidate record has no path field, skipping");
                None
            }
        })
        .filter(|path| config.paths.is_empty() || config.paths.contains(path))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::resolve;
    use crate::models::ReplaceOptions;

    fn candidates(paths: &[&str]) -> Vec<CandidateFile> {
        paths.iter().map(|p| CandidateFile::from_path(*p)).collect()
    }

    fn config_with_paths(paths: &[&str]) -> EffectiveConfig {
        let options = ReplaceOptions {
            paths: Some(paths.iter().map(|p| p.to_string()).collect()),
            ..ReplaceOptions::default()
        };
        resolve(Some(&options), None)
    }

    #[test]
    fn test_empty_allow_list_selects_everything() {
        let records = candidates(&[
            "test_files/date.txt",
            "test_files/manifest.json",
            "test_files/timestamp.txt",
            "test_files/version.txt",
        ]);
        let config = resolve(None, None);

        let paths = select_paths(&records, &config);

        assert_eq!(paths.len(), 4);
        assert_eq!(paths[0], "test_files/date.txt");
        assert_eq!(paths[3], "test_files/version.txt");
    }

    #[test]
    fn test_allow_list_filters_exactly() {
        let records = candidates(&[
            "test_files/date.txt",
            "test_files/manifest.json",
            "test_files/timestamp.txt",
            "test_files/version.txt",
        ]);
        let config = config_with_paths(&["test_files/version.txt"]);

        let paths = select_paths(&records, &config);

        assert_eq!(paths, vec![Utf8PathBuf::from("test_files/version.txt")]);
    }

    #[test]
    fn test_output_preserves_candidate_order_not_allow_list_order() {
        let records = candidates(&["a.txt", "b.txt", "c.txt"]);
        let config = config_with_paths(&["c.txt", "a.txt"]);

        let paths = select_paths(&records, &config);

        assert_eq!(
            paths,
            vec![Utf8PathBuf::from("a.txt"), Utf8PathBuf::from("c.txt")]
        );
    }

    #[test]
    fn test_backslashes_normalized_before_filtering() {
        let records = candidates(&["public\\js\\app.js"]);
        let config = config_with_paths(&["public/js/app.js"]);

        let paths = select_paths(&records, &config);

        assert_eq!(paths, vec![Utf8PathBuf::from("public/js/app.js")]);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let records = candidates(&["Public/App.js"]);
        let config = config_with_paths(&["public/app.js"]);

        assert!(select_paths(&records, &config).is_empty());
    }

    #[test]
    fn test_duplicates_are_not_deduplicated() {
        let records = candidates(&["a.txt", "a.txt"]);
        let config = resolve(None, None);

        let paths = select_paths(&records, &config);

        assert_eq!(paths.len(), 2);
    }

    #[test]
    fn test_destination_path_wins_over_path() {
        let records = vec![CandidateFile {
            destination_path: Some("public\\app.js".to_string()),
            dest_path: None,
            path: Some("src/app.js".to_string()),
        }];
        let config = resolve(None, None);

        let paths = select_paths(&records, &config);

        assert_eq!(paths, vec![Utf8PathBuf::from("public/app.js")]);
    }

    #[test]
    fn test_pathless_records_are_skipped() {
        let records = vec![
            CandidateFile::default(),
            CandidateFile::from_path("kept.txt"),
        ];
        let config = resolve(None, None);

        let paths = select_paths(&records, &config);

        assert_eq!(paths, vec![Utf8PathBuf::from("kept.txt")]);
    }
}
