//! Module `file_ops`
//!
//! The two transfer handlers that run over an accepted data connection:
//! draining an upload into a file, and sending a directory listing.

use log::{debug, info};
use std::path::Path;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{FtpServerError, TransferError};
use crate::storage::{format_listing, list_directory, store_file};
use crate::transfer::results::{ListingResult, UploadResult};

/// Reads `data_stream` in `buffer_size` chunks until the peer closes it.
pub async fn receive_upload<S>(
    data_stream: &mut S,
    buffer_size: usize,
) -> Result<Vec<u8>, TransferError>
where
    S: AsyncRead + Unpin,
{
    let mut buffer = vec![0u8; buffer_size.max(1)];
    let mut received = Vec::new();

    loop {
        let n = data_stream
            .read(&mut buffer)
            .await
            .map_err(TransferError::ConnectionLost)?;
        if n == 0 {
            break;
        }
        received.extend_from_slice(&buffer[..n]);
    }

    debug!("Upload stream closed after {} bytes", received.len());
    Ok(received)
}

/// Handles uploading a file from the client to the server.
///
/// Everything is received first, then written in one go to `file_path`,
/// replacing any existing file.
pub async fn handle_file_upload<S>(
    mut data_stream: S,
    file_path: &Path,
    buffer_size: usize,
) -> Result<UploadResult, FtpServerError>
where
    S: AsyncRead + Unpin,
{
    info!("Starting file upload: {}", file_path.display());

    let data = receive_upload(&mut data_stream, buffer_size).await?;
    drop(data_stream);

    let stored = store_file(file_path, &data).await?;

    info!(
        "File upload completed successfully: {} ({} bytes)",
        file_path.display(),
        stored.bytes_written
    );

    Ok(UploadResult {
        file_path: stored.file_path,
        bytes_received: data.len() as u64,
        bytes_written: stored.bytes_written,
    })
}

/// Writes `payload` to the data connection and closes our side of it.
pub async fn send_listing<S>(data_stream: &mut S, payload: &[u8]) -> Result<u64, TransferError>
where
    S: AsyncWrite + Unpin,
{
    data_stream
        .write_all(payload)
        .await
        .map_err(TransferError::ConnectionLost)?;
    data_stream
        .flush()
        .await
        .map_err(TransferError::ConnectionLost)?;
    data_stream
        .shutdown()
        .await
        .map_err(TransferError::ConnectionLost)?;
    Ok(payload.len() as u64)
}

/// Handles LIST: enumerates `dir` and sends one line per entry.
pub async fn handle_directory_listing<S>(
    mut data_stream: S,
    dir: &Path,
) -> Result<ListingResult, FtpServerError>
where
    S: AsyncWrite + Unpin,
{
    let entries = list_directory(dir).await?;
    let payload = format_listing(&entries);
    let bytes_sent = send_listing(&mut data_stream, payload.as_bytes()).await?;

    info!(
        "Directory listing of {} sent ({} entries, {} bytes)",
        dir.display(),
        entries.len(),
        bytes_sent
    );

    Ok(ListingResult {
        entries: entries.len(),
        bytes_sent,
    })
}
