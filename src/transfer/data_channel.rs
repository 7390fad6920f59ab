//! Module `data_channel`
//!
//! A passive-mode data channel: one OS-assigned ephemeral listener that
//! accepts exactly one peer and is then gone. Ownership does the
//! bookkeeping. `accept` consumes the channel, and dropping a channel that
//! was never used closes its listener.

use log::{debug, info};
use std::net::{IpAddr, Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

use crate::error::TransferError;

/// A bound passive listener waiting for its single data connection.
#[derive(Debug)]
pub struct DataChannel {
    listener: TcpListener,
    port: u16,
    advertised: Ipv4Addr,
    accept_timeout: Duration,
}

impl DataChannel {
    /// Binds a listener on `bind_ip` with port 0 so the OS picks a free
    /// ephemeral port, and remembers which address to advertise.
    pub async fn open(
        bind_ip: IpAddr,
        advertised: Ipv4Addr,
        accept_timeout: Duration,
    ) -> Result<Self, TransferError> {
        let listener = TcpListener::bind(SocketAddr::new(bind_ip, 0))
            .await
            .map_err(TransferError::BindFailed)?;
        let port = listener
            .local_addr()
            .map_err(TransferError::BindFailed)?
            .port();

        debug!("Passive listener bound on {}:{}", bind_ip, port);

        Ok(Self {
            listener,
            port,
            advertised,
            accept_timeout,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Address the client is told to connect to.
    pub fn advertised_socket(&self) -> SocketAddrV4 {
        SocketAddrV4::new(self.advertised, self.port)
    }

    /// The `(o1,o2,o3,o4,p1,p2)` tuple for the 227 reply.
    pub fn pasv_tuple(&self) -> String {
        encode_pasv_address(self.advertised, self.port)
    }

    /// Waits for the one data connection this channel exists for.
    ///
    /// The listener is closed when this returns, whether a peer connected,
    /// the accept failed, or the timeout elapsed.
    pub async fn accept(self) -> Result<TcpStream, TransferError> {
        let port = self.port;
        let result = match timeout(self.accept_timeout, self.listener.accept()).await {
            Ok(Ok((stream, peer))) => {
                info!("Data connection accepted from {} on port {}", peer, port);
                Ok(stream)
            }
            Ok(Err(e)) => Err(TransferError::AcceptFailed(e)),
            Err(_) => Err(TransferError::AcceptTimeout(self.accept_timeout)),
        };
        drop(self.listener);
        debug!("Passive listener on port {} closed", port);
        result
    }
}

/// Encodes an IPv4 address and port as `o1,o2,o3,o4,p1,p2` with
/// `p1 = port / 256` and `p2 = port % 256`.
pub fn encode_pasv_address(ip: Ipv4Addr, port: u16) -> String {
    let [o1, o2, o3, o4] = ip.octets();
    format!("{},{},{},{},{},{}", o1, o2, o3, o4, port / 256, port % 256)
}

/// Inverse of `encode_pasv_address`; accepts the tuple with or without
/// surrounding parentheses.
pub fn decode_pasv_address(tuple: &str) -> Option<SocketAddrV4> {
    let inner = tuple.trim().trim_start_matches('(').trim_end_matches(')');
    let parts: Vec<u8> = inner
        .split(',')
        .map(|p| p.trim().parse::<u8>())
        .collect::<Result<_, _>>()
        .ok()?;
    if parts.len() != 6 {
        return None;
    }
    let ip = Ipv4Addr::new(parts[0], parts[1], parts[2], parts[3]);
    let port = u16::from(parts[4]) * 256 + u16::from(parts[5]);
    Some(SocketAddrV4::new(ip, port))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    #[test]
    fn test_encode_pasv_address() {
        assert_eq!(
            encode_pasv_address(Ipv4Addr::new(127, 0, 0, 1), 8001),
            "127,0,0,1,31,65"
        );
        assert_eq!(
            encode_pasv_address(Ipv4Addr::new(10, 1, 2, 3), 65535),
            "10,1,2,3,255,255"
        );
        assert_eq!(encode_pasv_address(Ipv4Addr::UNSPECIFIED, 255), "0,0,0,0,0,255");
    }

    #[test]
    fn test_decode_pasv_address() {
        assert_eq!(
            decode_pasv_address("(127,0,0,1,31,65)"),
            Some(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 8001))
        );
        assert_eq!(decode_pasv_address("127,0,0,1,31"), None);
        assert_eq!(decode_pasv_address("127,0,0,1,300,1"), None);
    }

    #[tokio::test]
    async fn test_open_binds_ephemeral_port() {
        let channel = DataChannel::open(LOCALHOST, Ipv4Addr::LOCALHOST, Duration::from_secs(5))
            .await
            .unwrap();

        assert_ne!(channel.port(), 0);
        assert_eq!(
            decode_pasv_address(&channel.pasv_tuple()),
            Some(channel.advertised_socket())
        );
        // the advertised port is really listening
        TcpStream::connect(("127.0.0.1", channel.port()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_channels_get_distinct_ports() {
        let a = DataChannel::open(LOCALHOST, Ipv4Addr::LOCALHOST, Duration::from_secs(5))
            .await
            .unwrap();
        let b = DataChannel::open(LOCALHOST, Ipv4Addr::LOCALHOST, Duration::from_secs(5))
            .await
            .unwrap();
        assert_ne!(a.port(), b.port());
    }

    #[tokio::test]
    async fn test_accept_returns_peer_and_closes_listener() {
        let channel = DataChannel::open(LOCALHOST, Ipv4Addr::LOCALHOST, Duration::from_secs(5))
            .await
            .unwrap();
        let port = channel.port();

        let client = tokio::spawn(async move { TcpStream::connect(("127.0.0.1", port)).await });
        let stream = channel.accept().await.unwrap();
        client.await.unwrap().unwrap();

        assert!(stream.peer_addr().is_ok());
        assert!(TcpStream::connect(("127.0.0.1", port)).await.is_err());
    }

    #[tokio::test]
    async fn test_accept_times_out() {
        let channel = DataChannel::open(
            LOCALHOST,
            Ipv4Addr::LOCALHOST,
            Duration::from_millis(50),
        )
        .await
        .unwrap();
        let port = channel.port();

        let result = channel.accept().await;

        assert!(matches!(result, Err(TransferError::AcceptTimeout(_))));
        assert!(TcpStream::connect(("127.0.0.1", port)).await.is_err());
    }

    #[tokio::test]
    async fn test_drop_closes_listener() {
        let channel = DataChannel::open(LOCALHOST, Ipv4Addr::LOCALHOST, Duration::from_secs(5))
            .await
            .unwrap();
        let port = channel.port();
        drop(channel);

        assert!(TcpStream::connect(("127.0.0.1", port)).await.is_err());
    }
}
