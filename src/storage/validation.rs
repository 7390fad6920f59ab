//! Path validation
//!
//! Resolves client-supplied STOR targets against the session's working
//! directory.

use std::path::{Path, PathBuf};

use crate::error::StorageError;

/// Resolves `target` relative to `cwd`. Absolute targets are used as given.
pub fn resolve_target_path(cwd: &Path, target: &str) -> Result<PathBuf, StorageError> {
    let target = target.trim();
    if target.is_empty() {
        return Err(StorageError::InvalidPath("empty path".into()));
    }
    if target.contains('\0') {
        return Err(StorageError::InvalidPath(target.replace('\0', "\\0")));
    }

    let path = cwd.join(target);
    if path.file_name().is_none() {
        return Err(StorageError::InvalidPath(target.to_string()));
    }
    Ok(path)
}
