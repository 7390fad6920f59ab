//! Storage operations
//!
//! Filesystem side of LIST and STOR: enumerating a directory and writing an
//! uploaded buffer to its destination.

use log::{debug, info, warn};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::StorageError;
use crate::storage::results::{ListEntry, StoreResult};

/// Lists the contents of a directory, sorted by name.
///
/// Entries whose metadata cannot be read are skipped with a warning.
pub async fn list_directory(dir: &Path) -> Result<Vec<ListEntry>, StorageError> {
    let mut read_dir = fs::read_dir(dir)
        .await
        .map_err(|e| StorageError::ListFailed(dir.to_path_buf(), e))?;

    let mut entries = Vec::new();
    loop {
        let entry = match read_dir.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => return Err(StorageError::ListFailed(dir.to_path_buf(), e)),
        };

        let name = entry.file_name().to_string_lossy().to_string();
        match entry.metadata().await {
            Ok(metadata) => entries.push(ListEntry {
                name,
                size: metadata.len(),
                is_dir: metadata.is_dir(),
            }),
            Err(e) => {
                warn!("Skipping {} in {}: {}", name, dir.display(), e);
            }
        }
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    debug!("Listed {} entries in {}", entries.len(), dir.display());
    Ok(entries)
}

/// Serializes entries into the LIST payload, one line per entry.
pub fn format_listing(entries: &[ListEntry]) -> String {
    entries.iter().map(ListEntry::to_line).collect()
}

/// Writes `data` to `path`, creating or truncating it.
///
/// The file length is read back afterwards; anything other than
/// `data.len()` is reported as a size mismatch.
pub async fn store_file(path: &Path, data: &[u8]) -> Result<StoreResult, StorageError> {
    let write_failed = |e| StorageError::WriteFailed(path.to_path_buf(), e);

    let mut file = fs::File::create(path).await.map_err(write_failed)?;
    file.write_all(data).await.map_err(write_failed)?;
    file.flush().await.map_err(write_failed)?;
    file.sync_all().await.map_err(write_failed)?;

    let written = file.metadata().await.map_err(write_failed)?.len();
    let received = data.len() as u64;
    if written != received {
        return Err(StorageError::SizeMismatch { received, written });
    }

    info!("Stored {} ({} bytes)", path.display(), written);
    Ok(StoreResult {
        file_path: path.to_path_buf(),
        bytes_written: written,
    })
}
