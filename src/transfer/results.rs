//! Transfer result types
//!
//! Defines result structures returned by transfer operations.

use std::net::SocketAddrV4;
use std::path::PathBuf;

/// Result of setting up passive mode
#[derive(Debug, Clone)]
pub struct PassiveModeResult {
    pub data_socket: SocketAddrV4,
    /// `o1,o2,o3,o4,p1,p2` as sent in the 227 reply.
    pub pasv_tuple: String,
}

/// Result of a completed STOR
#[derive(Debug, Clone)]
pub struct UploadResult {
    pub file_path: PathBuf,
    pub bytes_received: u64,
    pub bytes_written: u64,
}

/// Result of a completed LIST
#[derive(Debug, Clone)]
pub struct ListingResult {
    pub entries: usize,
    pub bytes_sent: u64,
}
