//! A minimal passive-mode FTP server.
//!
//! Supports USER, PASS, TYPE, PASV, LIST, STOR, PUT and QUIT over a
//! line-oriented control connection, with one short-lived data connection
//! per transfer.

pub mod client;
pub mod error;
pub mod middleware;
pub mod protocol;
pub mod server;
pub mod storage;
pub mod transfer;

pub use server::{Server, ServerConfig};
