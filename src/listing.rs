//! Creation-time listing of a folder's files

use std::fs::{self, Metadata};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use log::debug;

use crate::error::{Error, Result};

/// Default name of the listing written into the folder
pub const LISTING_NAME: &str = "file_list_sorted.txt";

/// A file with the timestamp it is sorted by
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTimestamp {
    pub name: String,
    pub created: SystemTime,
}

impl FileTimestamp {
    /// `stem<TAB>extension<TAB>YYYY-MM-DD HH:MM:SS` in local time
    pub fn to_line(&self) -> String {
        let path = Path::new(&self.name);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        let created: DateTime<Local> = self.created.into();
        format!("{}\t{}\t{}", stem, extension, created.format("%Y-%m-%d %H:%M:%S"))
    }
}

/// Creation time, or modification time where the platform records no birth time
fn creation_time(metadata: &Metadata) -> Result<SystemTime> {
    match metadata.created() {
        Ok(time) => Ok(time),
        Err(e) => {
            debug!("Creation time unavailable ({}), using modification time", e);
            Ok(metadata.modified()?)
        }
    }
}

/// Regular files of `dir`, oldest first; `exclude` names are left out
pub fn files_by_creation_time(dir: &Path, exclude: &[&str]) -> Result<Vec<FileTimestamp>> {
    let entries = fs::read_dir(dir).map_err(|e| Error::directory(dir, e))?;
    let mut files = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|e| Error::directory(dir, e))?;
        let metadata = entry.metadata()?;
        if !metadata.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if exclude.contains(&name.as_str()) {
            continue;
        }
        files.push(FileTimestamp {
            created: creation_time(&metadata)?,
            name,
        });
    }

    files.sort_by(|a, b| a.created.cmp(&b.created).then_with(|| a.name.cmp(&b.name)));
    Ok(files)
}

/// Write the sorted listing of `dir` to `output` (default: `dir/file_list_sorted.txt`)
pub fn write_listing(dir: &Path, output: Option<&Path>) -> Result<(PathBuf, usize)> {
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| dir.join(LISTING_NAME));
    let output_name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let exclude: Vec<&str> = if output.parent() == Some(dir) {
        vec![output_name.as_str()]
    } else {
        Vec::new()
    };
    let files = files_by_creation_time(dir, &exclude)?;

    let mut file = fs::File::create(&output)?;
    for entry in &files {
        writeln!(file, "{}", entry.to_line())?;
    }
    debug!("Listed {} files into {}", files.len(), output.display());
    Ok((output, files.len()))
}
