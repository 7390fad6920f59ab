//! Client session management
//!
//! Handles client session lifecycle and state transitions.

use log::debug;

use crate::client::Client;
use crate::transfer::cleanup_data_channel;

/// Where a control session is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Connected, 220 not yet sent.
    Greeting,
    /// Reading and dispatching commands.
    Active,
    Closed,
}

/// Manages client session lifecycle
#[derive(Debug)]
pub struct ClientSession {
    client: Client,
    state: SessionState,
}

impl ClientSession {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            state: SessionState::Greeting,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn get_client(&self) -> &Client {
        &self.client
    }

    pub fn get_client_mut(&mut self) -> &mut Client {
        &mut self.client
    }

    /// Greeting sent; start taking commands.
    pub fn activate(&mut self) {
        if self.state == SessionState::Greeting {
            self.state = SessionState::Active;
        }
    }

    /// Terminal transition. Releases the pending data channel, if any.
    pub fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        cleanup_data_channel(&mut self.client);
        self.state = SessionState::Closed;
        debug!("Session for {} closed", self.client.peer_label());
    }

    pub fn is_closed(&self) -> bool {
        self.state == SessionState::Closed
    }
}

impl Drop for ClientSession {
    fn drop(&mut self) {
        self.close();
    }
}
