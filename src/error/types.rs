//! Error types
//!
//! Defines domain-specific error types for each module of the FTP server.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Data channel errors
#[derive(Debug)]
pub enum TransferError {
    /// PASV could not bind an ephemeral listening socket.
    BindFailed(io::Error),
    InvalidAdvertisedAddress(String),
    /// Nobody connected to the passive listener in time.
    AcceptTimeout(Duration),
    AcceptFailed(io::Error),
    /// The data connection broke while bytes were flowing.
    ConnectionLost(io::Error),
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::BindFailed(e) => write!(f, "Failed to bind data listener: {}", e),
            TransferError::InvalidAdvertisedAddress(a) => {
                write!(f, "Invalid passive address (IPv4 required): {}", a)
            }
            TransferError::AcceptTimeout(d) => {
                write!(f, "No data connection within {} seconds", d.as_secs())
            }
            TransferError::AcceptFailed(e) => write!(f, "Failed to accept data connection: {}", e),
            TransferError::ConnectionLost(e) => write!(f, "Data connection lost: {}", e),
        }
    }
}

impl std::error::Error for TransferError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransferError::BindFailed(e)
            | TransferError::AcceptFailed(e)
            | TransferError::ConnectionLost(e) => Some(e),
            _ => None,
        }
    }
}

/// Storage module errors
#[derive(Debug)]
pub enum StorageError {
    ListFailed(PathBuf, io::Error),
    WriteFailed(PathBuf, io::Error),
    SizeMismatch { received: u64, written: u64 },
    InvalidPath(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::ListFailed(p, e) => {
                write!(f, "Failed to list directory {}: {}", p.display(), e)
            }
            StorageError::WriteFailed(p, e) => {
                write!(f, "Failed to write file {}: {}", p.display(), e)
            }
            StorageError::SizeMismatch { received, written } => write!(
                f,
                "Size mismatch: received {} bytes but wrote {} bytes",
                received, written
            ),
            StorageError::InvalidPath(p) => write!(f, "Invalid path: {}", p),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::ListFailed(_, e) | StorageError::WriteFailed(_, e) => Some(e),
            _ => None,
        }
    }
}

/// Top-level server error
#[derive(Debug)]
pub enum FtpServerError {
    Transfer(TransferError),
    Storage(StorageError),
    Config(config::ConfigError),
    Io(io::Error),
}

impl fmt::Display for FtpServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FtpServerError::Transfer(e) => write!(f, "Transfer error: {}", e),
            FtpServerError::Storage(e) => write!(f, "Storage error: {}", e),
            FtpServerError::Config(e) => write!(f, "Configuration error: {}", e),
            FtpServerError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for FtpServerError {}

impl From<TransferError> for FtpServerError {
    fn from(error: TransferError) -> Self {
        FtpServerError::Transfer(error)
    }
}

impl From<StorageError> for FtpServerError {
    fn from(error: StorageError) -> Self {
        FtpServerError::Storage(error)
    }
}

impl From<config::ConfigError> for FtpServerError {
    fn from(error: config::ConfigError) -> Self {
        FtpServerError::Config(error)
    }
}

impl From<io::Error> for FtpServerError {
    fn from(error: io::Error) -> Self {
        FtpServerError::Io(error)
    }
}
