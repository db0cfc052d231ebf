//! Source folder scanning.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::format;

/// List the supported images directly inside `source_dir`.
///
/// The scan is not recursive. Entries are deduplicated by canonical path and
/// sorted by path, so repeated runs visit images in the same order.
///
/// Fails if the folder is missing, is not a directory, or holds no
/// supported image.
pub fn enumerate(source_dir: &Path) -> Result<Vec<PathBuf>> {
    if !source_dir.exists() {
        return Err(Error::SourceMissing(source_dir.to_path_buf()));
    }
    if !source_dir.is_dir() {
        return Err(Error::NotADirectory(source_dir.to_path_buf()));
    }

    let entries = std::fs::read_dir(source_dir).map_err(|e| Error::io(source_dir, e))?;

    let mut seen = HashSet::new();
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::io(source_dir, e))?.path();
        if !path.is_file() || !format::is_supported(&path) {
            continue;
        }
        let key = path.canonicalize().unwrap_or_else(|_| path.clone());
        if seen.insert(key) {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(Error::NoImages(source_dir.to_path_buf()));
    }

    files.sort();
    Ok(files)
}
