//! Client management system
//!
//! Handles client connections, state management, and session lifecycle.

pub mod handler;
pub mod session;
pub mod state;

pub use handler::{handle_client, run_session};
pub use session::{ClientSession, SessionState};
pub use state::Client;
