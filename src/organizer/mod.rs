//! Moving files into category folders and batch summary runs

pub mod batch;
pub mod keyword;
pub mod label;

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, error, info};

use crate::error::{Error, Result};
use crate::utils::{safe_move_file, unique_destination};

pub use batch::{batch_summarize, read_batch_file, BatchReport};
pub use keyword::{sort_by_keyword, KeywordRules};
pub use label::{sort_by_label, DEFAULT_LABELS};

/// Result of a sorting pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SortSummary {
    /// `(file name, destination)` for every file moved (or planned, on a dry run)
    pub moved: Vec<(String, PathBuf)>,
    /// Files left in place because nothing matched
    pub skipped: Vec<String>,
    /// Files whose move failed
    pub failed: Vec<String>,
}

/// Regular file names of `dir`, sorted
pub(crate) fn regular_files(dir: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir).map_err(|e| Error::directory(dir, e))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::directory(dir, e))?;
        if !entry.path().is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(name) => debug!("Skipping non-UTF-8 file name {:?}", name),
        }
    }
    names.sort();
    Ok(names)
}

/// Move `file_name` from `dir` into `target_dir`, recording the outcome
pub(crate) fn move_into(
    dir: &Path,
    file_name: &str,
    target_dir: &Path,
    dry_run: bool,
    summary: &mut SortSummary,
) {
    let src = dir.join(file_name);
    let dest = unique_destination(target_dir, file_name);

    if dry_run {
        info!("Would move '{}' -> {}", file_name, dest.display());
        summary.moved.push((file_name.to_string(), dest));
        return;
    }

    match safe_move_file(&src, &dest) {
        Ok(()) => {
            info!("Moved '{}' -> {}", file_name, dest.display());
            summary.moved.push((file_name.to_string(), dest));
        }
        Err(e) => {
            error!("Error moving file {}: {}", src.display(), e);
            summary.failed.push(file_name.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn regular_files_are_sorted_and_skip_folders() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.png"), b"b").unwrap();
        fs::write(dir.path().join("a.png"), b"a").unwrap();
        fs::create_dir(dir.path().join("snap")).unwrap();

        assert_eq!(regular_files(dir.path()).unwrap(), vec!["a.png", "b.png"]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_names_are_skipped_not_failed() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(OsStr::from_bytes(b"bad\xff_zstack.czi")), b"x").unwrap();
        fs::write(dir.path().join("ok_zstack.czi"), b"x").unwrap();

        assert_eq!(regular_files(dir.path()).unwrap(), vec!["ok_zstack.czi"]);

        let summary = sort_by_keyword(dir.path(), &KeywordRules::default(), false).unwrap();
        assert_eq!(summary.moved.len(), 1);
        assert!(summary.failed.is_empty());
        assert!(dir.path().join(OsStr::from_bytes(b"bad\xff_zstack.czi")).is_file());
    }
}
