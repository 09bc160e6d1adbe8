//! Configuration (0x70), including the bulk forms.

use serde::{Deserialize, Serialize};

use crate::command::ZWaveCommand;
use crate::errors::{DecodeError, Result};
use crate::values::{read_signed_be, read_u16_be, write_signed_be};

/// One configuration parameter with its signed value; shared by set and
/// report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationValue {
    /// Parameter number
    pub parameter: u8,
    /// Width of the value in bytes (1, 2 or 4)
    pub size: u8,
    /// Signed parameter value
    pub value: i64,
}

/// A bulk report: a run of consecutive parameters starting at an offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationBulkReport {
    /// First parameter number in this run
    pub parameter_offset: u16,
    /// Reports still to come for this bulk get
    pub to_follow: u8,
    /// Values are factory defaults
    pub default: bool,
    /// Device expects a handshake before applying
    pub handshake: bool,
    /// Width of each value in bytes (1, 2 or 4)
    pub size: u8,
    /// Consecutive parameter values starting at `parameter_offset`
    pub values: Vec<i64>,
}

impl ConfigurationValue {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        dst.push(self.parameter);
        dst.push(self.size & 0b111);
        write_signed_be(self.value, self.size, dst);
    }
}

impl ConfigurationBulkReport {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        dst.extend_from_slice(&self.parameter_offset.to_be_bytes());
        dst.push(self.values.len() as u8);
        dst.push(self.to_follow);
        dst.push(
            u8::from(self.default) << 7 | u8::from(self.handshake) << 6 | self.size & 0b111,
        );
        for value in &self.values {
            write_signed_be(*value, self.size, dst);
        }
    }
}

pub(super) fn decode_value(rest: &[u8], context: &'static str) -> Result<ConfigurationValue> {
    if rest.len() < 2 {
        return Err(DecodeError::short(context, 3, rest.len()));
    }
    let size = rest[1] & 0b111;
    Ok(ConfigurationValue {
        parameter: rest[0],
        size,
        value: read_signed_be(&rest[2..], size)?,
    })
}

pub(super) fn decode_get(rest: &[u8]) -> Result<u8> {
    let Some(&parameter) = rest.first() else {
        return Err(DecodeError::short("configuration get", 1, 0));
    };
    Ok(parameter)
}

pub(super) fn decode_bulk_get(rest: &[u8]) -> Result<ZWaveCommand> {
    if rest.len() < 3 {
        return Err(DecodeError::short("configuration bulk get", 3, rest.len()));
    }
    Ok(ZWaveCommand::ConfigurationBulkGet {
        parameter_offset: read_u16_be(rest, "configuration bulk get")?,
        count: rest[2],
    })
}

pub(super) fn decode_bulk_report(rest: &[u8]) -> Result<ZWaveCommand> {
    if rest.len() < 5 {
        return Err(DecodeError::short("configuration bulk report", 5, rest.len()));
    }
    let parameter_offset = read_u16_be(rest, "configuration bulk report")?;
    let count = usize::from(rest[2]);
    let to_follow = rest[3];
    let flags = rest[4];
    let size = flags & 0b111;

    let mut values = Vec::with_capacity(count);
    let mut tail = &rest[5..];
    for _ in 0..count {
        values.push(read_signed_be(tail, size)?);
        tail = &tail[usize::from(size)..];
    }

    Ok(ZWaveCommand::ConfigurationBulkReport(ConfigurationBulkReport {
        parameter_offset,
        to_follow,
        default: flags & 0x80 != 0,
        handshake: flags & 0x40 != 0,
        size,
        values,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_decodes_signed_value() {
        let body = [0x70, 0x06, 0x0D, 0x02, 0xFF, 0x38];
        let ZWaveCommand::ConfigurationReport(report) = ZWaveCommand::decode(&body).unwrap()
        else {
            panic!("expected configuration report");
        };
        assert_eq!(report.parameter, 13);
        assert_eq!(report.value, -200);
    }

    #[test]
    fn set_round_trip() {
        let command = ZWaveCommand::ConfigurationSet(ConfigurationValue {
            parameter: 7,
            size: 4,
            value: 100_000,
        });
        let bytes = command.to_bytes();
        assert_eq!(bytes, vec![0x70, 0x04, 0x07, 0x04, 0x00, 0x01, 0x86, 0xA0]);
        assert_eq!(ZWaveCommand::decode(&bytes).unwrap(), command);
    }

    #[test]
    fn bulk_report_with_to_follow() {
        let report = ConfigurationBulkReport {
            parameter_offset: 0x0100,
            to_follow: 2,
            default: false,
            handshake: false,
            size: 2,
            values: vec![1, -1, 300],
        };
        let bytes = ZWaveCommand::ConfigurationBulkReport(report.clone()).to_bytes();
        assert_eq!(
            ZWaveCommand::decode(&bytes).unwrap(),
            ZWaveCommand::ConfigurationBulkReport(report)
        );
    }

    #[test]
    fn bulk_report_truncated_values() {
        let body = [0x70, 0x09, 0x01, 0x00, 0x03, 0x00, 0x02, 0x00, 0x01];
        assert!(ZWaveCommand::decode(&body).is_err());
    }
}
