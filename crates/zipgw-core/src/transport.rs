//! Datagram transport abstraction.
//!
//! The core treats the socket as an opaque pair of `send`/`recv` halves.
//! Production uses a connected UDP socket; the harness substitutes scripted
//! and simulated-network implementations. DTLS termination, when present,
//! belongs to whatever sits behind this trait - the client never sees it.

use std::io;
use std::net::{IpAddr, SocketAddr};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::net::UdpSocket;

use crate::config::ZipConfig;

/// Largest datagram the gateway will send; Z/IP frames are far smaller.
const MAX_DATAGRAM: usize = 1024;

/// A bidirectional datagram channel to the gateway.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Send one datagram.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error; the coordinator treats any send
    /// failure as fatal to the transport.
    async fn send(&self, datagram: &[u8]) -> io::Result<()>;

    /// Receive one datagram, waiting until one arrives.
    ///
    /// # Errors
    ///
    /// Returns an error when the channel is closed or the socket fails;
    /// both are fatal to the transport.
    async fn recv(&self) -> io::Result<Bytes>;
}

/// Production transport: a UDP socket connected to the gateway.
pub struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    /// Bind the configured local port and connect to the gateway.
    ///
    /// The wildcard address of the gateway's family is bound so v4 and v6
    /// gateways both work without configuration.
    ///
    /// # Errors
    ///
    /// Returns the bind or connect failure.
    pub async fn connect(config: &ZipConfig) -> io::Result<Self> {
        let wildcard: IpAddr = match config.gateway_addr {
            SocketAddr::V4(_) => IpAddr::from([0u8; 4]),
            SocketAddr::V6(_) => IpAddr::from([0u8; 16]),
        };
        let socket = UdpSocket::bind((wildcard, config.local_port)).await?;
        socket.connect(config.gateway_addr).await?;
        Ok(Self { socket })
    }

    /// The local address actually bound.
    ///
    /// # Errors
    ///
    /// Returns the socket error if the address cannot be read.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }
}

#[async_trait]
impl Transport for UdpTransport {
    async fn send(&self, datagram: &[u8]) -> io::Result<()> {
        self.socket.send(datagram).await.map(|_| ())
    }

    async fn recv(&self) -> io::Result<Bytes> {
        let mut buf = [0u8; MAX_DATAGRAM];
        let len = self.socket.recv(&mut buf).await?;
        Ok(Bytes::copy_from_slice(&buf[..len]))
    }
}
