//! Meter (0x32) and Battery (0x80).

use serde::{Deserialize, Serialize};

use crate::command::ZWaveCommand;
use crate::errors::{DecodeError, Result};
use crate::values::{meta_byte, read_signed_be, read_u16_be, write_signed_be};

/// Metered quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum MeterType {
    Electric,
    Gas,
    Water,
    Heating,
    Cooling,
    Unknown(u8),
}

impl MeterType {
    const fn from_byte(byte: u8) -> Self {
        match byte {
            0x01 => Self::Electric,
            0x02 => Self::Gas,
            0x03 => Self::Water,
            0x04 => Self::Heating,
            0x05 => Self::Cooling,
            other => Self::Unknown(other),
        }
    }

    const fn to_byte(self) -> u8 {
        match self {
            Self::Electric => 0x01,
            Self::Gas => 0x02,
            Self::Water => 0x03,
            Self::Heating => 0x04,
            Self::Cooling => 0x05,
            Self::Unknown(other) => other,
        }
    }
}

/// Ask for a meter reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeterGet {
    /// Unit to report in (3-bit scale selector)
    pub scale: u8,
}

/// A meter reading.
///
/// The 3-bit scale is split on the wire: its high bit rides in the first
/// byte, the low two bits next to precision and size in the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeterReport {
    /// Metered quantity
    pub meter_type: MeterType,
    /// Import/export rate selector (2 bits)
    pub rate_type: u8,
    /// Unit selector, reassembled from its split halves
    pub scale: u8,
    /// Decimal places of the reading
    pub precision: u8,
    /// Width of the wire integers in bytes (1, 2 or 4)
    pub size: u8,
    /// Raw reading; the metered value is `value * 10^(-precision)`
    pub value: i64,
    /// Seconds since the previous reading, when the device tracks one
    pub delta_time: Option<u16>,
    /// The previous reading, present only with a non-zero delta time
    pub previous_value: Option<i64>,
}

impl MeterGet {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        dst.push((self.scale & 0b111) << 3);
    }
}

impl MeterReport {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        let scale2 = (self.scale >> 2) & 0b1;
        dst.push(scale2 << 7 | (self.rate_type & 0b11) << 5 | self.meter_type.to_byte() & 0b1_1111);
        dst.push(meta_byte(self.precision, self.scale & 0b11, self.size));
        write_signed_be(self.value, self.size, dst);
        if let Some(delta) = self.delta_time {
            dst.extend_from_slice(&delta.to_be_bytes());
            if let Some(previous) = self.previous_value {
                write_signed_be(previous, self.size, dst);
            }
        }
    }
}

/// Battery charge as reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatteryLevel {
    /// Charge percentage 0..=100
    Percent(u8),
    /// 0xFF: the device raised its low-battery warning
    LowWarning,
}

impl BatteryLevel {
    /// Interpret a wire byte (total).
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            0xFF => Self::LowWarning,
            other => Self::Percent(other),
        }
    }

    /// Map back to the wire byte.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::Percent(level) => level,
            Self::LowWarning => 0xFF,
        }
    }
}

/// A battery report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatteryReport {
    /// Remaining charge
    pub level: BatteryLevel,
}

impl BatteryReport {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        dst.push(self.level.to_byte());
    }
}

pub(super) fn decode_meter_get(rest: &[u8]) -> Result<ZWaveCommand> {
    // v1 get has no payload.
    let scale = match rest.first() {
        Some(&properties) => (properties >> 3) & 0b111,
        None => 0,
    };
    Ok(ZWaveCommand::MeterGet(MeterGet { scale }))
}

pub(super) fn decode_meter_report(rest: &[u8]) -> Result<ZWaveCommand> {
    if rest.len() < 2 {
        return Err(DecodeError::short("meter report", 3, rest.len()));
    }
    let meter_type = MeterType::from_byte(rest[0] & 0b1_1111);
    let rate_type = (rest[0] >> 5) & 0b11;
    let scale2 = rest[0] >> 7;

    let meta = rest[1];
    let precision = meta >> 5;
    let scale = scale2 << 2 | (meta >> 3) & 0b11;
    let size = meta & 0b111;

    let value = read_signed_be(&rest[2..], size)?;
    let mut tail = &rest[2 + usize::from(size)..];

    let mut delta_time = None;
    let mut previous_value = None;
    if tail.len() >= 2 {
        delta_time = Some(read_u16_be(tail, "meter delta time")?);
        tail = &tail[2..];
        if !tail.is_empty() {
            previous_value = Some(read_signed_be(tail, size)?);
        }
    }

    Ok(ZWaveCommand::MeterReport(MeterReport {
        meter_type,
        rate_type,
        scale,
        precision,
        size,
        value,
        delta_time,
        previous_value,
    }))
}

pub(super) fn decode_battery_report(rest: &[u8]) -> Result<ZWaveCommand> {
    let Some(&level) = rest.first() else {
        return Err(DecodeError::short("battery report", 1, 0));
    };
    Ok(ZWaveCommand::BatteryReport(BatteryReport { level: BatteryLevel::from_byte(level) }))
}
