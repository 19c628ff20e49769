//! Transcript file discovery.

use std::path::{Path, PathBuf};

use crate::error::UploadError;

/// A single file is returned as-is; a directory yields its `*.kif` files,
/// sorted by path.
pub fn collect_kif_files(path: &Path) -> Result<Vec<PathBuf>, UploadError> {
    if !path.exists() {
        return Err(UploadError::MissingPath(path.display().to_string()));
    }
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let escaped = glob::Pattern::escape(&path.to_string_lossy());
    let pattern = format!("{escaped}/*.kif");
    let mut files: Vec<PathBuf> = glob::glob(&pattern)?
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    Ok(files)
}
