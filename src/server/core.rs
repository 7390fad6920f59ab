use log::{error, info, warn};
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::client::handle_client;
use crate::error::FtpServerError;
use crate::middleware::logging::log_connection;
use crate::server::config::ServerConfig;

/// The control-channel listener. Every accepted connection gets its own task
/// and its own session; sessions share nothing but the read-only config.
pub struct Server {
    listener: TcpListener,
    config: Arc<ServerConfig>,
}

impl Server {
    /// Binds the control port and resolves the server root.
    pub async fn new(mut config: ServerConfig) -> Result<Self, FtpServerError> {
        config.validate()?;

        let root = PathBuf::from(&config.server_root);
        if let Err(e) = std::fs::create_dir_all(&root) {
            warn!("Failed to create server root directory: {}", e);
        }
        match root.canonicalize() {
            Ok(absolute) => config.server_root = absolute.to_string_lossy().to_string(),
            Err(e) => warn!("Could not resolve server root {}: {}", root.display(), e),
        }
        info!("Server root directory: {}", config.server_root);

        let socket = config.control_socket();
        let listener = TcpListener::bind(&socket).await.map_err(|e| {
            error!("Failed to bind to {}: {}", socket, e);
            e
        })?;
        info!("Server bound to {}", listener.local_addr()?);

        Ok(Self {
            listener,
            config: Arc::new(config),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept loop. Never returns under normal operation.
    pub async fn start(&self) {
        info!("Starting FTP server on {}", self.config.control_socket());

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    log_connection(&addr.to_string());
                    let config = Arc::clone(&self.config);

                    // Spawn a task for each client so accept loop doesn't block
                    tokio::spawn(async move {
                        handle_client(stream, addr, config).await;
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}
