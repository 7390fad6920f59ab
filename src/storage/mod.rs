//! File system storage
//!
//! Directory enumeration, upload persistence, and path resolution.

pub mod operations;
pub mod results;
pub mod validation;

pub use operations::{format_listing, list_directory, store_file};
pub use results::{ListEntry, StoreResult};
pub use validation::resolve_target_path;
