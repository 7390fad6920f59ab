//! Transfer operations
//!
//! Passive data channel setup and teardown for a single session.

use log::info;

use crate::client::Client;
use crate::error::TransferError;
use crate::server::config::ServerConfig;
use crate::transfer::data_channel::DataChannel;
use crate::transfer::results::PassiveModeResult;

/// Sets up passive mode for the next transfer.
///
/// Any channel still pending from an earlier PASV is closed before the new
/// listener is bound. On failure the session is left with no channel.
pub async fn setup_passive_mode(
    client: &mut Client,
    config: &ServerConfig,
) -> Result<PassiveModeResult, TransferError> {
    cleanup_data_channel(client);

    let advertised = config.pasv_ipv4()?;
    let bind_ip = config.bind_ip()?;

    let channel = DataChannel::open(bind_ip, advertised, config.data_accept_timeout()).await?;
    let result = PassiveModeResult {
        data_socket: channel.advertised_socket(),
        pasv_tuple: channel.pasv_tuple(),
    };

    info!(
        "Client {} bound to data socket {} in PASV mode",
        client.peer_label(),
        result.data_socket
    );

    client.set_data_channel(channel);
    Ok(result)
}

/// Closes the session's pending data channel, if any.
pub fn cleanup_data_channel(client: &mut Client) {
    if let Some(stale) = client.take_data_channel() {
        info!(
            "Closing unused data channel on port {} for client {}",
            stale.port(),
            client.peer_label()
        );
        drop(stale);
    }
}
