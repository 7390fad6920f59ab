//! Storage result types
//!
//! Defines result structures returned by storage operations.

use std::path::PathBuf;

/// One directory entry as it appears in a LIST payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub name: String,
    pub size: u64,
    pub is_dir: bool,
}

impl ListEntry {
    /// Serializes as `name\tsize\tis_dir\r\n`.
    pub fn to_line(&self) -> String {
        format!("{}\t{}\t{}\r\n", self.name, self.size, self.is_dir)
    }
}

/// Result of a file storage operation
#[derive(Debug, Clone)]
pub struct StoreResult {
    pub file_path: PathBuf,
    pub bytes_written: u64,
}
