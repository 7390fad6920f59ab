//! FTP Command parsing
//!
//! Handles parsing of FTP commands from client input.

use crate::protocol::Command;

/// Parses a raw control line into a `Command`.
///
/// The line is split on single spaces. The first token becomes the
/// upper-cased verb, the rest become arguments, each trimmed. An empty line
/// gives an empty verb, which the dispatcher rejects as unrecognized.
pub fn parse_command(raw: &str) -> Command {
    let line = raw.trim_end_matches(['\r', '\n']);
    let mut parts = line.split(' ');

    let verb = parts.next().unwrap_or("").trim().to_ascii_uppercase();
    let args = parts.map(|arg| arg.trim().to_string()).collect();

    Command { verb, args }
}
