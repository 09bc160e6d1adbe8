//! Mailbox (0x69): where the gateway queues frames for sleeping nodes.

use std::net::Ipv6Addr;

use serde::{Deserialize, Serialize};

use crate::command::ZWaveCommand;
use crate::errors::{DecodeError, Result};
use crate::values::read_u16_be;

/// Mailbox operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum MailboxMode {
    Disabled,
    Service,
    Proxy,
    Unknown(u8),
}

impl MailboxMode {
    const fn from_byte(byte: u8) -> Self {
        match byte & 0b111 {
            0x00 => Self::Disabled,
            0x01 => Self::Service,
            0x02 => Self::Proxy,
            other => Self::Unknown(other),
        }
    }

    const fn to_byte(self) -> u8 {
        match self {
            Self::Disabled => 0x00,
            Self::Service => 0x01,
            Self::Proxy => 0x02,
            Self::Unknown(other) => other,
        }
    }
}

/// The gateway's mailbox configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailboxConfigurationReport {
    /// Operating mode
    pub mode: MailboxMode,
    /// Queue capacity in frames
    pub capacity: u16,
    /// Forwarding destination when proxying
    pub destination: Ipv6Addr,
    /// Destination UDP port
    pub udp_port: u16,
}

impl MailboxConfigurationReport {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        dst.push(self.mode.to_byte());
        dst.extend_from_slice(&self.capacity.to_be_bytes());
        dst.extend_from_slice(&self.destination.octets());
        dst.extend_from_slice(&self.udp_port.to_be_bytes());
    }
}

pub(super) fn decode_configuration_report(rest: &[u8]) -> Result<ZWaveCommand> {
    if rest.len() < 21 {
        return Err(DecodeError::short("mailbox configuration report", 21, rest.len()));
    }
    let octets: [u8; 16] = rest[3..19].try_into().expect("slice length checked above");
    Ok(ZWaveCommand::MailboxConfigurationReport(MailboxConfigurationReport {
        mode: MailboxMode::from_byte(rest[0]),
        capacity: read_u16_be(&rest[1..], "mailbox capacity")?,
        destination: Ipv6Addr::from(octets),
        udp_port: read_u16_be(&rest[19..], "mailbox udp port")?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_report_round_trip() {
        let report = MailboxConfigurationReport {
            mode: MailboxMode::Proxy,
            capacity: 350,
            destination: "fd00:aaaa::2".parse().unwrap(),
            udp_port: 4123,
        };
        let bytes = ZWaveCommand::MailboxConfigurationReport(report).to_bytes();
        assert_eq!(bytes.len(), 2 + 21);
        assert_eq!(
            ZWaveCommand::decode(&bytes).unwrap(),
            ZWaveCommand::MailboxConfigurationReport(report)
        );
    }

    #[test]
    fn get_has_empty_payload() {
        let command = ZWaveCommand::MailboxConfigurationGet;
        assert_eq!(command.to_bytes(), vec![0x69, 0x01]);
        assert_eq!(ZWaveCommand::decode(&[0x69, 0x01]).unwrap(), command);
    }
}
