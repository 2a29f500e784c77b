use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info, warn};

use crate::error::{Error, Result};
use crate::models::SummaryConfig;
use crate::summary::{build_summary, default_output, SummaryOutcome};

/// Per-folder outcome of a batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    pub completed: Vec<SummaryOutcome>,
    /// Lines that were not a folder
    pub skipped: Vec<String>,
    /// Folders whose deck could not be built
    pub failed: Vec<(PathBuf, Error)>,
}

/// Folder lines of a batch file; blank lines and `#` comments are ignored
pub fn read_batch_file(batch_file: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(batch_file)
        .map_err(|e| Error::Batch(format!("cannot read {}: {}", batch_file.display(), e)))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Build one deck per listed folder, inside that folder
pub fn batch_summarize(batch_file: &Path, config: &SummaryConfig) -> Result<BatchReport> {
    info!("Reading folders from {}", batch_file.display());
    let dirs = read_batch_file(batch_file)?;
    info!("Found {} folders to summarize", dirs.len());

    let mut report = BatchReport::default();
    for (i, dir_str) in dirs.iter().enumerate() {
        let dir_path = PathBuf::from(dir_str);
        if !dir_path.is_dir() {
            warn!("'{}' is not a valid directory, skipping", dir_str);
            report.skipped.push(dir_str.clone());
            continue;
        }

        info!("Summarizing folder {}/{}: {}", i + 1, dirs.len(), dir_str);
        let output = default_output(&dir_path);
        match build_summary(std::slice::from_ref(&dir_path), &output, config) {
            Ok(outcome) => report.completed.push(outcome),
            Err(e) => {
                error!("{}: {}", dir_str, e);
                report.failed.push((dir_path, e));
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn comments_and_blank_lines_are_ignored() {
        let dir = TempDir::new().unwrap();
        let batch = dir.path().join("dirs.txt");
        fs::write(&batch, "# plates\n\n  /data/plate1  \n#/data/old\n/data/plate2\n").unwrap();

        let dirs = read_batch_file(&batch).unwrap();
        assert_eq!(dirs, vec!["/data/plate1", "/data/plate2"]);
    }

    #[test]
    fn unreadable_batch_file_is_a_batch_error() {
        let dir = TempDir::new().unwrap();
        let err = read_batch_file(&dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, Error::Batch(_)));
    }

    #[test]
    fn invalid_folders_are_skipped() {
        let dir = TempDir::new().unwrap();
        let plate = dir.path().join("plate");
        fs::create_dir(&plate).unwrap();
        let batch = dir.path().join("dirs.txt");
        fs::write(
            &batch,
            format!("{}\n{}\n", plate.display(), dir.path().join("nope").display()),
        )
        .unwrap();

        let report = batch_summarize(&batch, &SummaryConfig::default()).unwrap();

        assert_eq!(report.completed.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert!(report.failed.is_empty());
        assert!(default_output(&plate).is_file());
    }
}
