//! Wake Up (0x84): intervals for sleeping nodes. All intervals are 24-bit
//! second counts.

use serde::{Deserialize, Serialize};

use crate::command::ZWaveCommand;
use crate::errors::{DecodeError, Result};
use crate::nodes::NodeId;
use crate::values::{read_u24_be, write_u24_be};

/// Wake-up interval and the node to notify; shared by set and report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WakeUpInterval {
    /// Seconds between wake-ups (24-bit on the wire)
    pub seconds: u32,
    /// Node to send the wake-up notification to
    pub node_id: NodeId,
}

/// The interval bounds a device supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WakeUpIntervalCapabilities {
    /// Minimum supported interval in seconds
    pub min_seconds: u32,
    /// Maximum supported interval in seconds
    pub max_seconds: u32,
    /// Factory default interval in seconds
    pub default_seconds: u32,
    /// Supported interval granularity in seconds
    pub step_seconds: u32,
}

impl WakeUpInterval {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        write_u24_be(self.seconds, dst);
        dst.push(self.node_id.get());
    }
}

impl WakeUpIntervalCapabilities {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        write_u24_be(self.min_seconds, dst);
        write_u24_be(self.max_seconds, dst);
        write_u24_be(self.default_seconds, dst);
        write_u24_be(self.step_seconds, dst);
    }
}

pub(super) fn decode_interval(rest: &[u8], context: &'static str) -> Result<WakeUpInterval> {
    if rest.len() < 4 {
        return Err(DecodeError::short(context, 4, rest.len()));
    }
    Ok(WakeUpInterval {
        seconds: read_u24_be(rest, context)?,
        node_id: NodeId::new(rest[3])?,
    })
}

pub(super) fn decode_capabilities(rest: &[u8]) -> Result<ZWaveCommand> {
    if rest.len() < 12 {
        return Err(DecodeError::short("wake up capabilities report", 12, rest.len()));
    }
    Ok(ZWaveCommand::WakeUpIntervalCapabilitiesReport(WakeUpIntervalCapabilities {
        min_seconds: read_u24_be(&rest[0..], "min interval")?,
        max_seconds: read_u24_be(&rest[3..], "max interval")?,
        default_seconds: read_u24_be(&rest[6..], "default interval")?,
        step_seconds: read_u24_be(&rest[9..], "interval step")?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_report_24_bit() {
        let body = [0x84, 0x06, 0x01, 0x51, 0x80, 0x01];
        let ZWaveCommand::WakeUpIntervalReport(report) = ZWaveCommand::decode(&body).unwrap()
        else {
            panic!("expected interval report");
        };
        assert_eq!(report.seconds, 86400);
        assert_eq!(report.node_id.get(), 1);
    }

    #[test]
    fn interval_set_round_trip() {
        let command = ZWaveCommand::WakeUpIntervalSet(WakeUpInterval {
            seconds: 0x00_0E10,
            node_id: NodeId::new(1).unwrap(),
        });
        let bytes = command.to_bytes();
        assert_eq!(bytes, vec![0x84, 0x04, 0x00, 0x0E, 0x10, 0x01]);
        assert_eq!(ZWaveCommand::decode(&bytes).unwrap(), command);
    }

    #[test]
    fn capabilities_report_round_trip() {
        let report = WakeUpIntervalCapabilities {
            min_seconds: 600,
            max_seconds: 604_800,
            default_seconds: 86_400,
            step_seconds: 60,
        };
        let bytes = ZWaveCommand::WakeUpIntervalCapabilitiesReport(report).to_bytes();
        assert_eq!(
            ZWaveCommand::decode(&bytes).unwrap(),
            ZWaveCommand::WakeUpIntervalCapabilitiesReport(report)
        );
    }

    #[test]
    fn no_more_information_is_bare() {
        assert_eq!(ZWaveCommand::WakeUpNoMoreInformation.to_bytes(), vec![0x84, 0x08]);
    }
}
