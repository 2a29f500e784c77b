use std::fs;
use std::path::Path;

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{SampleSet, SummaryConfig};
use super::classify::classify;

/// Group a directory listing into samples
///
/// Names are processed in the given order; a later file for the same sample and
/// channel replaces the earlier one.
pub fn aggregate<I, S>(source_dir: &Path, file_names: I, config: &SummaryConfig) -> SampleSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut samples = SampleSet::new(source_dir);
    let mut skipped = 0usize;

    for name in file_names {
        let name = name.as_ref();
        let Some(found) = classify(name, &config.channels, config.match_policy) else {
            debug!("Skipping {}: no recognized channel suffix", name);
            skipped += 1;
            continue;
        };

        debug!(
            "Classified {} as sample '{}', channel {}",
            name, found.key, found.channel.label
        );

        if let Some(previous) = samples.insert(&found.key, &found.channel.suffix, name) {
            warn!(
                "Sample '{}' has two {} files; keeping {} over {}",
                found.key, found.channel.suffix, name, previous
            );
        }
    }

    debug!(
        "Grouped {} files into {} samples ({} skipped)",
        samples.file_count(),
        samples.len(),
        skipped
    );
    samples
}

/// List file names in `dir`, sorted, skipping sub-directories
pub fn list_file_names(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Err(Error::directory(
            dir,
            std::io::Error::new(std::io::ErrorKind::NotFound, "not an existing directory"),
        ));
    }

    let entries = fs::read_dir(dir).map_err(|e| Error::directory(dir, e))?;
    let mut names = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|e| Error::directory(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => debug!("Skipping non UTF-8 file name {:?}", raw),
        }
    }

    names.sort();
    Ok(names)
}

/// Scan a source folder and group its images into samples
pub fn scan_directory(dir: &Path, config: &SummaryConfig) -> Result<SampleSet> {
    let names = list_file_names(dir)?;
    debug!("Found {} files in {}", names.len(), dir.display());
    Ok(aggregate(dir, names, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChannelSet, MatchPolicy};
    use tempfile::TempDir;

    fn config_with(suffixes: &[&str]) -> SummaryConfig {
        SummaryConfig::new(
            ChannelSet::from_suffixes(suffixes).unwrap(),
            MatchPolicy::DeclaredOrder,
        )
    }

    #[test]
    fn two_channels_of_one_sample() {
        let config = config_with(&["_AttoX", "_BF", "_merged"]);
        let samples = aggregate(Path::new("."), ["s1_AttoX.png", "s1_BF.png"], &config);

        assert_eq!(samples.len(), 1);
        let record = samples.get("s1").unwrap();
        assert_eq!(record.file("_AttoX"), Some("s1_AttoX.png"));
        assert_eq!(record.file("_BF"), Some("s1_BF.png"));
        assert_eq!(record.file("_merged"), None);
    }

    #[test]
    fn duplicate_channel_keeps_last_file() {
        let config = config_with(&["_BF"]);
        let samples = aggregate(Path::new("."), ["s1_BF.png", "s1_BF.PNG"], &config);

        let record = samples.get("s1").unwrap();
        assert_eq!(record.len(), 1);
        assert_eq!(record.file("_BF"), Some("s1_BF.PNG"));
        assert_eq!(samples.file_count(), 1);
    }

    #[test]
    fn unrecognized_files_are_dropped() {
        let config = SummaryConfig::default();
        let samples = aggregate(
            Path::new("."),
            ["notes.txt", "s1_DAPI.png", "s2_BF.png"],
            &config,
        );
        assert_eq!(samples.len(), 1);
        assert!(samples.get("s2").is_some());
    }

    #[test]
    fn records_only_hold_configured_suffixes() {
        let config = SummaryConfig::default();
        let names = ["a_BF.png", "a_merged.png", "b_Atto488DPPE.png", "junk.png", "c_BF_merged.png"];
        let samples = aggregate(Path::new("."), names, &config);
        for record in samples.iter() {
            for suffix in record.suffixes() {
                assert!(config.channels.position(suffix).is_some());
            }
        }
    }

    #[test]
    fn iteration_is_sorted_by_key() {
        let config = SummaryConfig::default();
        let samples = aggregate(
            Path::new("."),
            ["z_BF.png", "a_BF.png", "m_BF.png", "B_BF.png"],
            &config,
        );
        let keys: Vec<&str> = samples.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["B", "a", "m", "z"]);
    }

    #[test]
    fn scan_directory_ignores_subfolders() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("s1_BF.png"), b"png").unwrap();
        std::fs::write(dir.path().join("s1_merged.png"), b"png").unwrap();
        std::fs::create_dir(dir.path().join("s2_BF.png")).unwrap();

        let samples = scan_directory(dir.path(), &SummaryConfig::default()).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples.get("s1").unwrap().len(), 2);
        assert_eq!(samples.source_dir(), dir.path());
    }

    #[test]
    fn scan_directory_empty_folder_has_no_samples() {
        let dir = TempDir::new().unwrap();
        let samples = scan_directory(dir.path(), &SummaryConfig::default()).unwrap();
        assert!(samples.is_empty());
    }

    #[test]
    fn scan_directory_missing_folder_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let err = scan_directory(&missing, &SummaryConfig::default()).unwrap_err();
        assert!(matches!(err, Error::DirectoryAccess { .. }));
    }

    #[test]
    fn scan_directory_rejects_a_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("s1_BF.png");
        std::fs::write(&file, b"png").unwrap();
        assert!(scan_directory(&file, &SummaryConfig::default()).is_err());
    }
}
