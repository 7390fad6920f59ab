//! Transfer module for FTP server
//!
//! Handles passive data channel management and the transfers that run over
//! an accepted data connection.

pub mod data_channel;
pub mod file_ops;
pub mod operations;
pub mod results;

// Re-export key types and functions
pub use data_channel::{DataChannel, decode_pasv_address, encode_pasv_address};
pub use file_ops::{handle_directory_listing, handle_file_upload};
pub use operations::{cleanup_data_channel, setup_passive_mode};
pub use results::{ListingResult, PassiveModeResult, UploadResult};
