use std::path::Path;

use log::{debug, info};

use crate::error::{Error, Result};
use crate::utils::{clean_name, ensure_directory_exists};
use super::{move_into, regular_files, SortSummary};

/// Condition labels used when none are given
pub const DEFAULT_LABELS: [&str; 4] = ["AAA", "BBB", "CCC", "DDD"];

/// Labels ordered longest first so a label never shadows a longer one containing it
pub fn match_order<S: AsRef<str>>(labels: &[S]) -> Vec<String> {
    let mut ordered: Vec<String> = labels.iter().map(|l| l.as_ref().to_string()).collect();
    // stable, so equal lengths keep the given order
    ordered.sort_by(|a, b| b.len().cmp(&a.len()));
    ordered
}

/// Move each file of `dir` into a folder named after the label it contains
pub fn sort_by_label<S: AsRef<str>>(dir: &Path, labels: &[S], dry_run: bool) -> Result<SortSummary> {
    let ordered = match_order(labels);
    if ordered.iter().any(|label| label.is_empty()) {
        return Err(Error::Config("labels must not be empty".to_string()));
    }

    let files = regular_files(dir)?;
    let mut summary = SortSummary::default();

    for file_name in files {
        let Some(label) = ordered.iter().find(|label| file_name.contains(label.as_str())) else {
            info!("Skipped: {} (no matching label)", file_name);
            summary.skipped.push(file_name);
            continue;
        };

        let target = dir.join(clean_name(label));
        if !dry_run {
            ensure_directory_exists(&target)?;
        }
        debug!("'{}' matches label {}", file_name, label);
        move_into(dir, &file_name, &target, dry_run, &mut summary);
    }

    Ok(summary)
}
