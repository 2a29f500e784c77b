use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::Result;

/// Create a directory if it doesn't exist
pub fn ensure_directory_exists(dir: &Path) -> Result<()> {
    if !dir.exists() {
        debug!("Directory {} does not exist. Creating it now.", dir.display());
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// First free path for `file_name` in `dir`, appending `_1`, `_2`, ... to the stem
pub fn unique_destination(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let path = Path::new(file_name);
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    let extension = path.extension().map(|ext| ext.to_string_lossy());

    let mut counter = 1;
    loop {
        let name = match &extension {
            Some(ext) => format!("{}_{}.{}", stem, counter, ext),
            None => format!("{}_{}", stem, counter),
        };
        let unique_path = dir.join(name);
        if !unique_path.exists() {
            return unique_path;
        }
        counter += 1;
    }
}

/// Safely move a file with fallback to copy+delete if rename fails
pub fn safe_move_file(src: &Path, dest: &Path) -> Result<()> {
    // Fast path; fails across filesystems
    match fs::rename(src, dest) {
        Ok(_) => Ok(()),
        Err(e) => {
            debug!("Rename failed for {}, trying copy+delete: {}", src.display(), e);

            fs::copy(src, dest)?;

            if let Err(e) = fs::remove_file(src) {
                // The copy landed, so the move still counts
                warn!(
                    "Could not delete source file {} after copying: {}",
                    src.display(),
                    e
                );
            }
            Ok(())
        }
    }
}
