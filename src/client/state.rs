//! Module `client`
//!
//! Defines the `Client` struct holding everything one control connection
//! owns: who logged in, where it is in the filesystem, and the pending
//! passive data channel.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::transfer::DataChannel;

/// Represents the state of a connected FTP client.
#[derive(Debug)]
pub struct Client {
    username: Option<String>,
    client_addr: Option<SocketAddr>,
    current_dir: PathBuf,
    is_logged_in: bool,
    data_channel: Option<DataChannel>,
}

impl Client {
    pub fn new(current_dir: PathBuf) -> Self {
        Self {
            username: None,
            client_addr: None,
            current_dir,
            is_logged_in: false,
            data_channel: None,
        }
    }

    // --------------------
    // Getter methods
    // --------------------

    /// Returns whether PASS has been accepted on this connection.
    pub fn is_logged_in(&self) -> bool {
        self.is_logged_in
    }

    /// Returns the username of the client if set.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Peer address for log lines, or `unknown`.
    pub fn peer_label(&self) -> String {
        self.client_addr
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    /// Returns whether a PASV channel is waiting for its transfer.
    pub fn has_data_channel(&self) -> bool {
        self.data_channel.is_some()
    }

    // --------------------
    // Setter methods
    // --------------------

    pub fn set_logged_in(&mut self, logged_in: bool) {
        self.is_logged_in = logged_in;
    }

    pub fn set_username(&mut self, username: Option<String>) {
        self.username = username;
    }

    pub fn set_client_addr(&mut self, addr: Option<SocketAddr>) {
        self.client_addr = addr;
    }

    /// Stores a freshly opened channel. Callers close any previous one
    /// first; a leftover is dropped here as a fallback.
    pub fn set_data_channel(&mut self, channel: DataChannel) {
        self.data_channel = Some(channel);
    }

    /// Hands the pending channel to a transfer, leaving none behind.
    pub fn take_data_channel(&mut self) -> Option<DataChannel> {
        self.data_channel.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_client_defaults() {
        let client = Client::new(PathBuf::from("/srv/ftp"));
        assert!(!client.is_logged_in());
        assert!(client.username().is_none());
        assert!(!client.has_data_channel());
        assert_eq!(client.current_dir(), Path::new("/srv/ftp"));
        assert_eq!(client.peer_label(), "unknown");
    }

    #[test]
    fn test_setters() {
        let mut client = Client::new(PathBuf::from("."));
        client.set_username(Some("alice".into()));
        client.set_logged_in(true);
        client.set_client_addr(Some("127.0.0.1:4000".parse().unwrap()));

        assert_eq!(client.username(), Some("alice"));
        assert!(client.is_logged_in());
        assert_eq!(client.peer_label(), "127.0.0.1:4000");
    }

    #[test]
    fn test_take_without_channel() {
        let mut client = Client::new(PathBuf::from("."));
        assert!(client.take_data_channel().is_none());
    }
}
