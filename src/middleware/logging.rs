//! Logging middleware
//!
//! Provides request logging functionality.

use log::info;

use crate::protocol::{Command, Verb};

/// Log a client connection
pub fn log_connection(client_addr: &str) {
    info!("Client connected: {}", client_addr);
}

/// Log a client disconnect
pub fn log_disconnect(client_addr: &str) {
    info!("Client {} disconnected", client_addr);
}

/// Log a client command
pub fn log_command(client_addr: &str, command: &Command) {
    info!("Received from {}: {}", client_addr, redacted(command));
}

/// Renders a command for the log with the PASS argument masked.
pub fn redacted(command: &Command) -> String {
    if command.args.is_empty() {
        return command.verb.clone();
    }
    match command.kind() {
        Some(Verb::Pass) => format!("{} ****", command.verb),
        _ => format!("{} {}", command.verb, command.args.join(" ")),
    }
}
