use log::{debug, error, info};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};
use tokio::net::TcpStream;

use crate::client::{Client, ClientSession};
use crate::middleware::logging::{log_command, log_disconnect};
use crate::protocol::responses::{self, Reply};
use crate::protocol::{CommandStatus, handle_command, parse_command, send_reply};
use crate::server::config::ServerConfig;

/// Outcome of reading one control line.
#[derive(Debug, PartialEq)]
enum LineRead {
    Line,
    TooLong,
    Eof,
}

/// Handles one FTP control connection until QUIT, EOF, or a read/write
/// error on the connection.
pub async fn handle_client(
    cmd_stream: TcpStream,
    client_addr: SocketAddr,
    config: Arc<ServerConfig>,
) {
    let (read_half, write_half) = cmd_stream.into_split();

    let mut client = Client::new(config.server_root_path());
    client.set_client_addr(Some(client_addr));

    if let Err(e) = run_session(read_half, write_half, client, &config).await {
        error!("Control connection to {} failed: {}", client_addr, e);
    }
    log_disconnect(&client_addr.to_string());
}

/// Runs the control session state machine over any byte stream pair.
///
/// Commands are handled strictly one at a time: the next line is not read
/// until the current command, including its transfer, has finished and its
/// reply has been written.
pub async fn run_session<R, W>(
    reader: R,
    mut writer: W,
    client: Client,
    config: &ServerConfig,
) -> io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut session = ClientSession::new(client);
    let peer = session.get_client().peer_label();
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();

    send_reply(&mut writer, &Reply::new(responses::READY, "FTP Server ready.")).await?;
    session.activate();

    loop {
        line.clear();
        match read_command_line(&mut reader, &mut line, config.max_command_length).await? {
            LineRead::Eof => {
                info!("Connection closed by client {}", peer);
                break;
            }
            LineRead::TooLong => {
                send_reply(
                    &mut writer,
                    &Reply::new(responses::SYNTAX_ERROR, "Command line too long."),
                )
                .await?;
                continue;
            }
            LineRead::Line => {}
        }

        let text = String::from_utf8_lossy(&line);
        let command = parse_command(&text);
        log_command(&peer, &command);

        let result = handle_command(&mut session, &command, &mut writer, config).await?;
        if let Some(reply) = &result.message {
            send_reply(&mut writer, reply).await?;
        }

        match result.status {
            CommandStatus::CloseConnection => break,
            CommandStatus::Failure(reason) => {
                debug!("{} from {} failed: {}", command.verb, peer, reason)
            }
            CommandStatus::Success => {}
        }
    }

    session.close();
    // peer may already be gone
    let _ = writer.shutdown().await;
    Ok(())
}

/// Reads one line into `line`. Only the CR/LF terminator is exempt from
/// the `max_len` limit.
///
/// An over-long line is consumed up to its newline and reported as
/// `TooLong`. A final line without a newline before EOF still counts.
async fn read_command_line<R>(
    reader: &mut R,
    line: &mut Vec<u8>,
    max_len: usize,
) -> io::Result<LineRead>
where
    R: AsyncBufRead + Unpin,
{
    let limit = max_len as u64 + 2;
    let n = (&mut *reader).take(limit).read_until(b'\n', line).await?;
    if n == 0 {
        return Ok(LineRead::Eof);
    }
    if line.ends_with(b"\n") || (n as u64) < limit {
        if content_len(line) > max_len {
            return Ok(LineRead::TooLong);
        }
        return Ok(LineRead::Line);
    }

    let mut discard = Vec::new();
    loop {
        discard.clear();
        let m = (&mut *reader)
            .take(limit)
            .read_until(b'\n', &mut discard)
            .await?;
        if m == 0 || discard.ends_with(b"\n") {
            break;
        }
    }
    Ok(LineRead::TooLong)
}

/// Length of `line` without its trailing `\n` or `\r\n`.
fn content_len(line: &[u8]) -> usize {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line).len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::io::{DuplexStream, ReadHalf, WriteHalf, duplex, split};

    struct TestClient {
        reader: BufReader<ReadHalf<DuplexStream>>,
        writer: WriteHalf<DuplexStream>,
    }

    impl TestClient {
        async fn send(&mut self, line: &str) {
            self.writer.write_all(line.as_bytes()).await.unwrap();
        }

        async fn reply(&mut self) -> String {
            let mut line = String::new();
            self.reader.read_line(&mut line).await.unwrap();
            line
        }
    }

    fn start(
        config: ServerConfig,
        root: &std::path::Path,
    ) -> (TestClient, tokio::task::JoinHandle<io::Result<()>>) {
        let (client_end, server_end) = duplex(8192);
        let (server_read, server_write) = split(server_end);
        let (client_read, client_write) = split(client_end);
        let client = Client::new(root.to_path_buf());

        let handle = tokio::spawn(async move {
            run_session(server_read, server_write, client, &config).await
        });

        (
            TestClient {
                reader: BufReader::new(client_read),
                writer: client_write,
            },
            handle,
        )
    }

    #[tokio::test]
    async fn test_greeting_then_commands() {
        let temp_dir = TempDir::new().unwrap();
        let (mut client, handle) = start(ServerConfig::default(), temp_dir.path());

        assert_eq!(client.reply().await, "220 FTP Server ready.\r\n");

        client.send("USER anonymous\r\n").await;
        assert_eq!(
            client.reply().await,
            "331 User 'anonymous' OK. Password required\r\n"
        );

        client.send("PASS guest\r\n").await;
        assert_eq!(
            client.reply().await,
            "230 OK. Current restricted directory is /\r\n"
        );

        client.send("TYPE I\r\n").await;
        assert_eq!(client.reply().await, "200 Type set to I.\r\n");

        client.send("QUIT\r\n").await;
        assert_eq!(client.reply().await, "");
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_unknown_verb_keeps_session_open() {
        let temp_dir = TempDir::new().unwrap();
        let (mut client, handle) = start(ServerConfig::default(), temp_dir.path());
        client.reply().await;

        client.send("FOO\r\n").await;
        assert_eq!(client.reply().await, "502 Command not implemented (FOO)\r\n");

        client.send("TYPE I\r\n").await;
        assert_eq!(client.reply().await, "200 Type set to I.\r\n");

        client.send("QUIT\r\n").await;
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_list_without_pasv_is_425() {
        let temp_dir = TempDir::new().unwrap();
        let (mut client, handle) = start(ServerConfig::default(), temp_dir.path());
        client.reply().await;

        client.send("LIST\r\n").await;
        assert_eq!(client.reply().await, "425 Can't open data connection.\r\n");

        client.send("QUIT\r\n").await;
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_overlong_line_rejected_and_session_survives() {
        let temp_dir = TempDir::new().unwrap();
        let config = ServerConfig {
            max_command_length: 16,
            ..ServerConfig::default()
        };
        let (mut client, handle) = start(config, temp_dir.path());
        client.reply().await;

        client.send(&format!("USER {}\r\n", "x".repeat(100))).await;
        assert_eq!(client.reply().await, "500 Command line too long.\r\n");

        client.send("USER bob\r\n").await;
        assert_eq!(
            client.reply().await,
            "331 User 'bob' OK. Password required\r\n"
        );

        client.send("QUIT\r\n").await;
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_non_utf8_input_does_not_end_session() {
        let temp_dir = TempDir::new().unwrap();
        let (mut client, handle) = start(ServerConfig::default(), temp_dir.path());
        client.reply().await;

        client.writer.write_all(b"\xff\xfe\r\n").await.unwrap();
        assert!(client.reply().await.starts_with("502 Command not implemented ("));

        client.send("QUIT\r\n").await;
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_eof_ends_session_cleanly() {
        let temp_dir = TempDir::new().unwrap();
        let (mut client, handle) = start(ServerConfig::default(), temp_dir.path());
        client.reply().await;

        client.writer.shutdown().await.unwrap();

        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_read_command_line_limits() {
        let input: &[u8] = b"PASV\r\nAAAAAAAAAAAA\r\nLIST";
        let mut reader = BufReader::new(input);
        let mut line = Vec::new();

        let read = read_command_line(&mut reader, &mut line, 8).await.unwrap();
        assert_eq!(read, LineRead::Line);
        assert_eq!(line, b"PASV\r\n");

        line.clear();
        let read = read_command_line(&mut reader, &mut line, 8).await.unwrap();
        assert_eq!(read, LineRead::TooLong);

        line.clear();
        let read = read_command_line(&mut reader, &mut line, 8).await.unwrap();
        assert_eq!(read, LineRead::Line);
        assert_eq!(line, b"LIST");

        line.clear();
        let read = read_command_line(&mut reader, &mut line, 8).await.unwrap();
        assert_eq!(read, LineRead::Eof);
    }

    #[tokio::test]
    async fn test_bare_newline_counts_toward_limit() {
        let input: &[u8] = b"AAAAAAAA\nAAAAAAAAA\nAAAAAAAA\r\nAAAAAAAAA";
        let mut reader = BufReader::new(input);
        let mut line = Vec::new();

        let read = read_command_line(&mut reader, &mut line, 8).await.unwrap();
        assert_eq!(read, LineRead::Line);
        assert_eq!(line, b"AAAAAAAA\n");

        line.clear();
        let read = read_command_line(&mut reader, &mut line, 8).await.unwrap();
        assert_eq!(read, LineRead::TooLong);

        line.clear();
        let read = read_command_line(&mut reader, &mut line, 8).await.unwrap();
        assert_eq!(read, LineRead::Line);
        assert_eq!(line, b"AAAAAAAA\r\n");

        // unterminated final line over the limit
        line.clear();
        let read = read_command_line(&mut reader, &mut line, 8).await.unwrap();
        assert_eq!(read, LineRead::TooLong);
    }
}
