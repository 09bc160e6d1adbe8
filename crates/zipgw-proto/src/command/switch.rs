//! Basic (0x20), Binary Switch (0x25) and Multilevel Switch (0x26).
//!
//! The three classes share the one-byte value layout; they differ only in
//! how the byte is interpreted.

use serde::{Deserialize, Serialize};

use crate::errors::{DecodeError, Result};

/// On/off value as used by Basic and Binary Switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryValue {
    /// 0x00
    Off,
    /// 0xFF
    On,
    /// Anything else, 0xFE meaning "state unknown" on recent devices
    Unknown(u8),
}

impl BinaryValue {
    /// Interpret a wire byte (total).
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            0x00 => Self::Off,
            0xFF => Self::On,
            other => Self::Unknown(other),
        }
    }

    /// Map back to the wire byte.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::Off => 0x00,
            Self::On => 0xFF,
            Self::Unknown(other) => other,
        }
    }
}

/// Dimmer value as used by Multilevel Switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwitchLevel {
    /// 0x00
    Off,
    /// 1..=99 percent
    Level(u8),
    /// 0xFF: on at the previous level
    FullOn,
    /// Anything else, 0xFE meaning "state unknown"
    Unknown(u8),
}

impl SwitchLevel {
    /// Interpret a wire byte (total).
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            0x00 => Self::Off,
            1..=99 => Self::Level(byte),
            0xFF => Self::FullOn,
            other => Self::Unknown(other),
        }
    }

    /// Map back to the wire byte.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::Off => 0x00,
            Self::Level(level) => level,
            Self::FullOn => 0xFF,
            Self::Unknown(other) => other,
        }
    }
}

pub(super) fn decode_binary_byte(rest: &[u8], context: &'static str) -> Result<BinaryValue> {
    let Some(&byte) = rest.first() else {
        return Err(DecodeError::short(context, 1, 0));
    };
    Ok(BinaryValue::from_byte(byte))
}

pub(super) fn decode_level_byte(rest: &[u8], context: &'static str) -> Result<SwitchLevel> {
    let Some(&byte) = rest.first() else {
        return Err(DecodeError::short(context, 1, 0));
    };
    Ok(SwitchLevel::from_byte(byte))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ZWaveCommand;

    #[test]
    fn binary_report_values() {
        for (byte, value) in [
            (0x00, BinaryValue::Off),
            (0xFF, BinaryValue::On),
            (0xFE, BinaryValue::Unknown(0xFE)),
        ] {
            let body = [0x25, 0x03, byte];
            assert_eq!(
                ZWaveCommand::decode(&body).unwrap(),
                ZWaveCommand::SwitchBinaryReport(value)
            );
        }
    }

    #[test]
    fn basic_set_round_trip() {
        let command = ZWaveCommand::BasicSet(BinaryValue::On);
        let bytes = command.to_bytes();
        assert_eq!(bytes, vec![0x20, 0x01, 0xFF]);
        assert_eq!(ZWaveCommand::decode(&bytes).unwrap(), command);
    }

    #[test]
    fn multilevel_percentages() {
        let body = [0x26, 0x03, 0x32];
        assert_eq!(
            ZWaveCommand::decode(&body).unwrap(),
            ZWaveCommand::SwitchMultilevelReport(SwitchLevel::Level(50))
        );
    }

    #[test]
    fn gets_have_empty_payload() {
        assert_eq!(ZWaveCommand::SwitchMultilevelGet.to_bytes(), vec![0x26, 0x02]);
        assert_eq!(
            ZWaveCommand::decode(&[0x26, 0x02]).unwrap(),
            ZWaveCommand::SwitchMultilevelGet
        );
    }
}
