//! Error handlers
//!
//! Turns command-local failures into FTP replies.

use crate::error::types::{FtpServerError, StorageError, TransferError};
use crate::protocol::responses::{self, Reply};
use log::error;

/// Log an FTP server error
pub fn handle_error(err: &FtpServerError) {
    error!("FTP Server Error: {}", err);
}

/// Convert error to FTP response code
pub fn error_to_ftp_code(err: &FtpServerError) -> u16 {
    match err {
        FtpServerError::Transfer(TransferError::ConnectionLost(_)) => responses::TRANSFER_ABORTED,
        FtpServerError::Transfer(_) => responses::CANT_OPEN_DATA_CONNECTION,
        FtpServerError::Storage(_) => responses::ACTION_NOT_TAKEN,
        FtpServerError::Config(_) | FtpServerError::Io(_) => responses::LOCAL_ERROR,
    }
}

/// Build the client-visible reply for a failed command.
pub fn error_reply(err: &FtpServerError) -> Reply {
    handle_error(err);
    let code = error_to_ftp_code(err);
    let text = match code {
        responses::TRANSFER_ABORTED => "Connection closed; transfer aborted.",
        responses::CANT_OPEN_DATA_CONNECTION => "Can't open data connection.",
        responses::ACTION_NOT_TAKEN => "Requested action not taken.",
        _ => "Requested action aborted: local error in processing.",
    };
    Reply::new(code, text)
}

impl From<TransferError> for Reply {
    fn from(err: TransferError) -> Self {
        error_reply(&err.into())
    }
}

impl From<StorageError> for Reply {
    fn from(err: StorageError) -> Self {
        error_reply(&err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_transfer_errors_map_to_425() {
        let err = FtpServerError::from(TransferError::AcceptTimeout(Duration::from_secs(30)));
        assert_eq!(error_to_ftp_code(&err), 425);

        let err = FtpServerError::from(TransferError::BindFailed(io::Error::new(
            io::ErrorKind::AddrInUse,
            "in use",
        )));
        assert_eq!(error_to_ftp_code(&err), 425);
    }

    #[test]
    fn test_lost_data_connection_maps_to_426() {
        let err = FtpServerError::from(TransferError::ConnectionLost(io::Error::new(
            io::ErrorKind::ConnectionReset,
            "reset",
        )));
        assert_eq!(error_to_ftp_code(&err), 426);
    }

    #[test]
    fn test_storage_errors_map_to_550() {
        let reply = Reply::from(StorageError::WriteFailed(
            PathBuf::from("/nope/file"),
            io::Error::new(io::ErrorKind::NotFound, "missing"),
        ));
        assert_eq!(reply.code(), 550);
        assert_eq!(reply.to_string(), "550 Requested action not taken.\r\n");

        let reply = Reply::from(StorageError::SizeMismatch {
            received: 10,
            written: 4,
        });
        assert_eq!(reply.code(), 550);
    }
}
