//! Command handlers module.
//!
//! One handler per verb in the dispatch table. Handlers that only touch
//! session state return their reply; LIST and STOR also write the
//! preliminary 150/125 mark to the control connection themselves, because it
//! has to go out before the data connection is accepted.
//!
//! Every failure local to a command becomes a reply here. Only errors writing
//! to the control connection come back as `Err` and end the session.

use log::{debug, info};
use std::io;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::client::{Client, ClientSession};
use crate::error::error_reply;
use crate::protocol::responses::{self, Reply};
use crate::protocol::{Command, CommandResult, Verb};
use crate::server::config::ServerConfig;
use crate::storage::resolve_target_path;
use crate::transfer::{handle_directory_listing, handle_file_upload, setup_passive_mode};

/// Writes one reply to the control connection and flushes it.
pub async fn send_reply<W>(control: &mut W, reply: &Reply) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    control.write_all(reply.to_string().as_bytes()).await?;
    control.flush().await
}

/// Dispatches a received FTP command to its corresponding handler.
///
/// Unrecognized verbs, including the empty verb of a blank line, always get
/// a 502 and leave the session open.
pub async fn handle_command<W>(
    session: &mut ClientSession,
    command: &Command,
    control: &mut W,
    config: &ServerConfig,
) -> io::Result<CommandResult>
where
    W: AsyncWrite + Unpin,
{
    let client = session.get_client_mut();

    let result = match command.kind() {
        Some(Verb::User) => handle_cmd_user(client, command),
        Some(Verb::Pass) => handle_cmd_pass(client),
        Some(Verb::Type) => handle_cmd_type(),
        Some(Verb::Pasv) => handle_cmd_pasv(client, config).await,
        Some(Verb::List) => handle_cmd_list(client, control).await?,
        Some(Verb::Stor) => handle_cmd_stor(client, command, control, config).await?,
        Some(Verb::Put) => handle_cmd_put(),
        Some(Verb::Quit) => handle_cmd_quit(client),
        None => handle_cmd_unknown(command),
    };

    Ok(result)
}

/// Records the username. Any name is accepted.
fn handle_cmd_user(client: &mut Client, command: &Command) -> CommandResult {
    let Some(username) = command.first_arg().map(str::to_string) else {
        return syntax_error("USER without a username");
    };

    let reply = Reply::new(
        responses::PASSWORD_REQUIRED,
        format!("User '{}' OK. Password required", username),
    );
    client.set_username(Some(username));
    client.set_logged_in(false);
    CommandResult::success(reply)
}

/// Marks the session logged in. Credentials are not checked.
fn handle_cmd_pass(client: &mut Client) -> CommandResult {
    client.set_logged_in(true);
    info!(
        "Client {} logged in as {}",
        client.peer_label(),
        client.username().unwrap_or("<no user>")
    );
    CommandResult::success(Reply::new(
        responses::LOGIN_SUCCESS,
        "OK. Current restricted directory is /",
    ))
}

/// Every transfer is binary, so any TYPE is acknowledged as I.
fn handle_cmd_type() -> CommandResult {
    CommandResult::success(Reply::new(responses::OK, "Type set to I."))
}

/// Opens a fresh passive listener, closing any earlier unused one.
async fn handle_cmd_pasv(client: &mut Client, config: &ServerConfig) -> CommandResult {
    match setup_passive_mode(client, config).await {
        Ok(pasv) => CommandResult::success(Reply::new(
            responses::ENTERING_PASSIVE_MODE,
            format!("Entering Passive Mode ({})", pasv.pasv_tuple),
        )),
        Err(e) => CommandResult::failure(e.to_string(), Reply::from(e)),
    }
}

/// Handles the LIST command: sends the working directory over the pending
/// data channel.
async fn handle_cmd_list<W>(client: &mut Client, control: &mut W) -> io::Result<CommandResult>
where
    W: AsyncWrite + Unpin,
{
    let Some(channel) = client.take_data_channel() else {
        return Ok(no_data_channel());
    };

    send_reply(
        control,
        &Reply::new(
            responses::OPENING_DATA_CONNECTION,
            "Opening ASCII mode data connection for file list.",
        ),
    )
    .await?;

    let data_stream = match channel.accept().await {
        Ok(stream) => stream,
        Err(e) => return Ok(CommandResult::failure(e.to_string(), Reply::from(e))),
    };

    match handle_directory_listing(data_stream, client.current_dir()).await {
        Ok(listing) => {
            debug!(
                "LIST for {} sent {} entries",
                client.peer_label(),
                listing.entries
            );
            Ok(transfer_complete())
        }
        Err(e) => Ok(CommandResult::failure(e.to_string(), error_reply(&e))),
    }
}

/// Handles the STOR command: receives a file over the pending data channel
/// and writes it to the target path, replacing any existing file.
async fn handle_cmd_stor<W>(
    client: &mut Client,
    command: &Command,
    control: &mut W,
    config: &ServerConfig,
) -> io::Result<CommandResult>
where
    W: AsyncWrite + Unpin,
{
    if !client.has_data_channel() {
        return Ok(no_data_channel());
    }

    let Some(target) = command.argument() else {
        return Ok(syntax_error("STOR without a path"));
    };

    let file_path = match resolve_target_path(client.current_dir(), &target) {
        Ok(path) => path,
        Err(e) => return Ok(CommandResult::failure(e.to_string(), Reply::from(e))),
    };

    let Some(channel) = client.take_data_channel() else {
        return Ok(no_data_channel());
    };

    send_reply(
        control,
        &Reply::new(responses::TRANSFER_STARTING, "Transfer starting"),
    )
    .await?;

    let data_stream = match channel.accept().await {
        Ok(stream) => stream,
        Err(e) => return Ok(CommandResult::failure(e.to_string(), Reply::from(e))),
    };

    match handle_file_upload(data_stream, &file_path, config.buffer_size).await {
        Ok(upload) => {
            info!(
                "Client {} stored {} ({} bytes)",
                client.peer_label(),
                upload.file_path.display(),
                upload.bytes_written
            );
            Ok(transfer_complete())
        }
        Err(e) => Ok(CommandResult::failure(e.to_string(), error_reply(&e))),
    }
}

/// PUT is acknowledged but moves no data.
fn handle_cmd_put() -> CommandResult {
    CommandResult::success(Reply::new(
        responses::OPENING_DATA_CONNECTION,
        "Accepted data connection",
    ))
}

/// Handles the QUIT command. Nothing is written back; the connection closes.
fn handle_cmd_quit(client: &mut Client) -> CommandResult {
    info!("Client {} requested to quit", client.peer_label());
    CommandResult::close()
}

/// Handles unknown or unsupported commands, echoing the verb.
fn handle_cmd_unknown(command: &Command) -> CommandResult {
    CommandResult::failure(
        "Unknown command",
        Reply::new(
            responses::NOT_IMPLEMENTED,
            format!("Command not implemented ({})", command.verb),
        ),
    )
}

fn no_data_channel() -> CommandResult {
    CommandResult::failure(
        "Data channel not initialized",
        Reply::new(
            responses::CANT_OPEN_DATA_CONNECTION,
            "Can't open data connection.",
        ),
    )
}

fn syntax_error(reason: &str) -> CommandResult {
    CommandResult::failure(
        reason,
        Reply::new(
            responses::SYNTAX_ERROR_IN_ARGUMENTS,
            "Syntax error in parameters or arguments.",
        ),
    )
}

fn transfer_complete() -> CommandResult {
    CommandResult::success(Reply::new(
        responses::TRANSFER_COMPLETE,
        "Transfer complete.",
    ))
}
