//! Middleware
//!
//! Cross-cutting concerns around command handling.

pub mod logging;
