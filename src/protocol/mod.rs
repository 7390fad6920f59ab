//! FTP Protocol implementation
//!
//! Handles FTP command parsing, dispatch, and response generation.

pub mod commands;
pub mod handlers;
pub mod parser;
pub mod responses;

pub use commands::{Command, CommandResult, CommandStatus, Verb};
pub use handlers::{handle_command, send_reply};
pub use parser::parse_command;
pub use responses::{Reply, format_response};
