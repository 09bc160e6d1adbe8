//! Network Management Basic (0x4D): learn mode and factory default reset.

use serde::{Deserialize, Serialize};

use crate::command::inclusion::InclusionStatus;
use crate::command::ZWaveCommand;
use crate::errors::{DecodeError, Result};
use crate::nodes::NodeId;

/// Learn-mode selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LearnMode {
    /// Leave learn mode (0x00)
    Disable,
    /// Classic learn mode, direct range only (0x01)
    Direct,
    /// Network-wide inclusion via explore frames (0x02)
    Routed,
}

impl LearnMode {
    const fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            0x00 => Ok(Self::Disable),
            0x01 => Ok(Self::Direct),
            0x02 => Ok(Self::Routed),
            other => Err(DecodeError::InvalidField { context: "learn mode", value: other }),
        }
    }

    const fn to_byte(self) -> u8 {
        match self {
            Self::Disable => 0x00,
            Self::Direct => 0x01,
            Self::Routed => 0x02,
        }
    }
}

/// Outcome of a default-set request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefaultSetStatus {
    /// Reset completed (0x06)
    Done,
    /// Controller busy, try again later (0x07)
    Busy,
    /// Unrecognized status byte
    Unknown(u8),
}

impl DefaultSetStatus {
    const fn from_byte(byte: u8) -> Self {
        match byte {
            0x06 => Self::Done,
            0x07 => Self::Busy,
            other => Self::Unknown(other),
        }
    }

    const fn to_byte(self) -> u8 {
        match self {
            Self::Done => 0x06,
            Self::Busy => 0x07,
            Self::Unknown(other) => other,
        }
    }
}

/// Put the gateway's controller into (or take it out of) learn mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnModeSet {
    /// Command sequence number
    pub seq_no: u8,
    /// Learn mode to enter
    pub mode: LearnMode,
}

/// Report ending a learn-mode session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnModeSetStatus {
    /// Command sequence number of the learn-mode-set this answers
    pub seq_no: u8,
    /// How the session ended
    pub status: InclusionStatus,
    /// Node id assigned by the including controller
    pub new_node_id: Option<NodeId>,
}

/// Reset the gateway's controller to factory defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultSet {
    /// Command sequence number
    pub seq_no: u8,
}

/// Report ending a default-set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultSetComplete {
    /// Command sequence number of the default-set this answers
    pub seq_no: u8,
    /// How the reset ended
    pub status: DefaultSetStatus,
}

impl LearnModeSet {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        dst.extend_from_slice(&[self.seq_no, 0x00, self.mode.to_byte()]);
    }
}

impl LearnModeSetStatus {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        dst.extend_from_slice(&[
            self.seq_no,
            self.status.to_byte(),
            0x00,
            self.new_node_id.map_or(0, NodeId::get),
        ]);
    }
}

impl DefaultSet {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        dst.push(self.seq_no);
    }
}

impl DefaultSetComplete {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        dst.extend_from_slice(&[self.seq_no, self.status.to_byte()]);
    }
}

pub(super) fn decode_learn_mode_set(rest: &[u8]) -> Result<ZWaveCommand> {
    let [seq_no, _reserved, mode] = *rest else {
        return Err(DecodeError::short("learn mode set", 3, rest.len()));
    };
    Ok(ZWaveCommand::LearnModeSet(LearnModeSet { seq_no, mode: LearnMode::from_byte(mode)? }))
}

pub(super) fn decode_learn_mode_set_status(rest: &[u8]) -> Result<ZWaveCommand> {
    let [seq_no, status, _reserved, node] = *rest else {
        return Err(DecodeError::short("learn mode set status", 4, rest.len()));
    };
    Ok(ZWaveCommand::LearnModeSetStatus(LearnModeSetStatus {
        seq_no,
        status: InclusionStatus::from_byte(status),
        new_node_id: NodeId::new(node).ok(),
    }))
}

pub(super) fn decode_default_set(rest: &[u8]) -> Result<ZWaveCommand> {
    let [seq_no] = *rest else {
        return Err(DecodeError::short("default set", 1, rest.len()));
    };
    Ok(ZWaveCommand::DefaultSet(DefaultSet { seq_no }))
}

pub(super) fn decode_default_set_complete(rest: &[u8]) -> Result<ZWaveCommand> {
    let [seq_no, status] = *rest else {
        return Err(DecodeError::short("default set complete", 2, rest.len()));
    };
    Ok(ZWaveCommand::DefaultSetComplete(DefaultSetComplete {
        seq_no,
        status: DefaultSetStatus::from_byte(status),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn learn_mode_status_carries_new_node() {
        let body = [0x4D, 0x02, 0x01, 0x06, 0x00, 0x2A];
        let ZWaveCommand::LearnModeSetStatus(status) = ZWaveCommand::decode(&body).unwrap() else {
            panic!("expected learn mode status");
        };
        assert_eq!(status.status, InclusionStatus::Done);
        assert_eq!(status.new_node_id, Some(NodeId::new(42).unwrap()));
    }

    #[test]
    fn default_set_round_trip() {
        let command = ZWaveCommand::DefaultSet(DefaultSet { seq_no: 9 });
        let bytes = command.to_bytes();
        assert_eq!(bytes, vec![0x4D, 0x06, 0x09]);
        assert_eq!(ZWaveCommand::decode(&bytes).unwrap(), command);
    }

    #[test]
    fn default_set_complete_statuses() {
        for (byte, status) in [
            (0x06, DefaultSetStatus::Done),
            (0x07, DefaultSetStatus::Busy),
            (0x42, DefaultSetStatus::Unknown(0x42)),
        ] {
            let body = [0x4D, 0x07, 0x01, byte];
            let ZWaveCommand::DefaultSetComplete(report) = ZWaveCommand::decode(&body).unwrap()
            else {
                panic!("expected default set complete");
            };
            assert_eq!(report.status, status);
        }
    }
}
