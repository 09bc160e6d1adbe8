//! Coordinator startup options.

use std::net::SocketAddr;
use std::time::Duration;

/// Options recognized at client startup.
#[derive(Debug, Clone)]
pub struct ZipConfig {
    /// Gateway address; Z/IP gateways listen on UDP 4123
    pub gateway_addr: SocketAddr,
    /// Local UDP port to bind
    pub local_port: u16,
    /// Retries per command after the first send
    pub default_retries: u8,
    /// Per-send response timeout
    pub send_timeout: Duration,
}

impl ZipConfig {
    /// UDP port Z/IP gateways listen on
    pub const DEFAULT_GATEWAY_PORT: u16 = 4123;

    /// Default local UDP port
    pub const DEFAULT_LOCAL_PORT: u16 = 4000;

    /// Config with the standard defaults for the given gateway.
    #[must_use]
    pub fn new(gateway_addr: SocketAddr) -> Self {
        Self {
            gateway_addr,
            local_port: Self::DEFAULT_LOCAL_PORT,
            default_retries: 2,
            send_timeout: Duration::from_millis(2000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ZipConfig::new("[fd00::2]:4123".parse().unwrap());
        assert_eq!(config.local_port, 4000);
        assert_eq!(config.default_retries, 2);
        assert_eq!(config.send_timeout, Duration::from_secs(2));
    }
}
