//! Configuration management
//!
//! Built-in defaults, overridden by an optional `config.toml` in the working
//! directory, overridden in turn by `MINIFTP_*` environment variables.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::io;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::TransferError;

const DEFAULT_CONFIG_FILE: &str = "config";
const ENV_PREFIX: &str = "MINIFTP";

/// Server configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// IP address the control and data listeners bind to
    pub bind_address: String,

    /// Port for the FTP control connection
    pub control_port: u16,

    /// IPv4 address advertised in PASV replies
    pub pasv_address: String,

    /// Initial working directory of every session
    pub server_root: String,

    /// How long a PASV listener waits for the client to connect
    pub data_accept_timeout_secs: u64,

    /// Chunk size for data connection reads
    pub buffer_size: usize,

    /// Longest control line accepted, in bytes
    pub max_command_length: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            control_port: 8000,
            pasv_address: "127.0.0.1".to_string(),
            server_root: ".".to_string(),
            data_accept_timeout_secs: 30,
            buffer_size: 8192,
            max_command_length: 512,
        }
    }
}

impl ServerConfig {
    /// Load configuration from config.toml with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Same as `load` with an explicit config file base name. A missing file
    /// is not an error.
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let settings = Config::builder()
            .set_default("bind_address", defaults.bind_address)?
            .set_default("control_port", defaults.control_port as i64)?
            .set_default("pasv_address", defaults.pasv_address)?
            .set_default("server_root", defaults.server_root)?
            .set_default(
                "data_accept_timeout_secs",
                defaults.data_accept_timeout_secs as i64,
            )?
            .set_default("buffer_size", defaults.buffer_size as i64)?
            .set_default("max_command_length", defaults.max_command_length as i64)?
            .add_source(File::with_name(config_path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_address.parse::<IpAddr>().is_err() {
            return Err(ConfigError::Message(format!(
                "bind_address is not an IP address: {}",
                self.bind_address
            )));
        }

        if self.pasv_address.parse::<Ipv4Addr>().is_err() {
            return Err(ConfigError::Message(format!(
                "pasv_address must be an IPv4 address: {}",
                self.pasv_address
            )));
        }

        if self.server_root.is_empty() {
            return Err(ConfigError::Message("server_root cannot be empty".into()));
        }

        if self.data_accept_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "data_accept_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.buffer_size == 0 {
            return Err(ConfigError::Message(
                "buffer_size must be greater than 0".into(),
            ));
        }

        if self.max_command_length == 0 {
            return Err(ConfigError::Message(
                "max_command_length must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Get bind address and control port as socket address string
    pub fn control_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.control_port)
    }

    pub fn bind_ip(&self) -> Result<IpAddr, TransferError> {
        self.bind_address.parse().map_err(|_| {
            TransferError::BindFailed(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid bind address {}", self.bind_address),
            ))
        })
    }

    pub fn pasv_ipv4(&self) -> Result<Ipv4Addr, TransferError> {
        self.pasv_address
            .parse()
            .map_err(|_| TransferError::InvalidAdvertisedAddress(self.pasv_address.clone()))
    }

    /// Get server root as PathBuf
    pub fn server_root_path(&self) -> PathBuf {
        PathBuf::from(&self.server_root)
    }

    pub fn data_accept_timeout(&self) -> Duration {
        Duration::from_secs(self.data_accept_timeout_secs)
    }
}
