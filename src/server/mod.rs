//! Server core functionality
//!
//! This module contains the main server implementation, configuration,
//! and core infrastructure for the FTP server.

pub mod config;
pub mod core;

pub use self::config::ServerConfig;
pub use self::core::Server;
