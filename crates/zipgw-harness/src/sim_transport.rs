//! Test transports: a scripted in-memory channel and a turmoil UDP socket.

use std::collections::VecDeque;
use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::Notify;
use zipgw_core::transport::Transport;

type Responder = Box<dyn FnMut(&[u8]) -> Vec<Vec<u8>> + Send>;

struct Inner {
    responder: Mutex<Responder>,
    inbound: Mutex<VecDeque<Bytes>>,
    sent: Mutex<Vec<Vec<u8>>>,
    notify: Notify,
    closed: AtomicBool,
}

/// In-memory transport driven by a responder closure.
///
/// Every datagram the client sends is recorded and handed to the
/// responder, whose return values are queued as inbound datagrams. Tests
/// can also push gateway-initiated frames with
/// [`ScriptedTransport::push_inbound`] and inspect everything sent with
/// [`ScriptedTransport::sent`]. Clones share the same channel, so a test
/// keeps a handle while the client owns another.
#[derive(Clone)]
pub struct ScriptedTransport {
    inner: Arc<Inner>,
}

impl ScriptedTransport {
    /// Build a transport around a responder closure.
    pub fn new(responder: impl FnMut(&[u8]) -> Vec<Vec<u8>> + Send + 'static) -> Self {
        Self {
            inner: Arc::new(Inner {
                responder: Mutex::new(Box::new(responder)),
                inbound: Mutex::new(VecDeque::new()),
                sent: Mutex::new(Vec::new()),
                notify: Notify::new(),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// A transport that swallows sends and answers nothing.
    #[must_use]
    pub fn silent() -> Self {
        Self::new(|_| Vec::new())
    }

    /// Queue a gateway-initiated datagram for the client.
    pub fn push_inbound(&self, datagram: Vec<u8>) {
        self.inner
            .inbound
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(Bytes::from(datagram));
        self.inner.notify.notify_one();
    }

    /// Everything the client has sent so far.
    #[must_use]
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.inner.sent.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clone()
    }

    /// Simulate transport loss: sends fail and `recv` errors once the
    /// queued datagrams are drained.
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
        self.inner.notify.notify_one();
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, datagram: &[u8]) -> io::Result<()> {
        if self.inner.closed.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "scripted transport closed"));
        }
        self.inner
            .sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(datagram.to_vec());

        let replies = {
            let mut responder =
                self.inner.responder.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            responder(datagram)
        };
        for reply in replies {
            self.push_inbound(reply);
        }
        Ok(())
    }

    async fn recv(&self) -> io::Result<Bytes> {
        loop {
            if let Some(datagram) = self
                .inner
                .inbound
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .pop_front()
            {
                return Ok(datagram);
            }
            if self.inner.closed.load(Ordering::SeqCst) {
                return Err(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "scripted transport closed",
                ));
            }
            self.inner.notify.notified().await;
        }
    }
}

/// UDP transport over turmoil's simulated network, for end-to-end tests
/// with a gateway host.
pub struct TurmoilUdpTransport {
    socket: turmoil::net::UdpSocket,
    gateway: SocketAddr,
}

impl TurmoilUdpTransport {
    /// Bind the local port inside the simulation and aim at the gateway.
    ///
    /// # Errors
    ///
    /// Returns the simulated bind failure.
    pub async fn connect(local_port: u16, gateway: SocketAddr) -> io::Result<Self> {
        let socket = turmoil::net::UdpSocket::bind(("0.0.0.0", local_port)).await?;
        Ok(Self { socket, gateway })
    }
}

#[async_trait]
impl Transport for TurmoilUdpTransport {
    async fn send(&self, datagram: &[u8]) -> io::Result<()> {
        self.socket.send_to(datagram, self.gateway).await.map(|_| ())
    }

    async fn recv(&self) -> io::Result<Bytes> {
        let mut buf = [0u8; 1024];
        loop {
            let (len, peer) = self.socket.recv_from(&mut buf).await?;
            if peer == self.gateway {
                return Ok(Bytes::copy_from_slice(&buf[..len]));
            }
        }
    }
}
