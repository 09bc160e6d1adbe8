//! Multilevel Sensor (0x31).

use serde::{Deserialize, Serialize};

use crate::command::ZWaveCommand;
use crate::errors::{DecodeError, Result};
use crate::values::ScaledValue;

/// Sensor types reported by the multilevel sensor class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum SensorType {
    Temperature,
    General,
    Luminance,
    Power,
    Humidity,
    Velocity,
    Direction,
    AtmosphericPressure,
    BarometricPressure,
    SolarRadiation,
    DewPoint,
    RainRate,
    TideLevel,
    Weight,
    Voltage,
    Current,
    Co2Level,
    AirFlow,
    TankCapacity,
    Distance,
    Unknown(u8),
}

impl SensorType {
    /// Interpret a wire byte (total).
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            0x01 => Self::Temperature,
            0x02 => Self::General,
            0x03 => Self::Luminance,
            0x04 => Self::Power,
            0x05 => Self::Humidity,
            0x06 => Self::Velocity,
            0x07 => Self::Direction,
            0x08 => Self::AtmosphericPressure,
            0x09 => Self::BarometricPressure,
            0x0A => Self::SolarRadiation,
            0x0B => Self::DewPoint,
            0x0C => Self::RainRate,
            0x0D => Self::TideLevel,
            0x0E => Self::Weight,
            0x0F => Self::Voltage,
            0x10 => Self::Current,
            0x11 => Self::Co2Level,
            0x12 => Self::AirFlow,
            0x17 => Self::TankCapacity,
            0x19 => Self::Distance,
            other => Self::Unknown(other),
        }
    }

    /// Map back to the wire byte.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::Temperature => 0x01,
            Self::General => 0x02,
            Self::Luminance => 0x03,
            Self::Power => 0x04,
            Self::Humidity => 0x05,
            Self::Velocity => 0x06,
            Self::Direction => 0x07,
            Self::AtmosphericPressure => 0x08,
            Self::BarometricPressure => 0x09,
            Self::SolarRadiation => 0x0A,
            Self::DewPoint => 0x0B,
            Self::RainRate => 0x0C,
            Self::TideLevel => 0x0D,
            Self::Weight => 0x0E,
            Self::Voltage => 0x0F,
            Self::Current => 0x10,
            Self::Co2Level => 0x11,
            Self::AirFlow => 0x12,
            Self::TankCapacity => 0x17,
            Self::Distance => 0x19,
            Self::Unknown(other) => other,
        }
    }
}

/// Ask for a sensor reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorMultilevelGet {
    /// Sensor to read
    pub sensor_type: SensorType,
    /// Preferred unit (device may ignore it)
    pub scale: u8,
}

/// A sensor reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorMultilevelReport {
    /// Sensor that produced the reading
    pub sensor_type: SensorType,
    /// The reading with its precision/scale metadata
    pub value: ScaledValue,
}

impl SensorMultilevelReport {
    /// The reading rounded to an integer.
    #[must_use]
    pub fn level(&self) -> i64 {
        self.value.level()
    }
}

impl SensorMultilevelGet {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        dst.extend_from_slice(&[self.sensor_type.to_byte(), (self.scale & 0b11) << 3]);
    }
}

impl SensorMultilevelReport {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        dst.push(self.sensor_type.to_byte());
        self.value.encode(dst);
    }
}

pub(super) fn decode_get(rest: &[u8]) -> Result<ZWaveCommand> {
    // The v1 get has no payload at all; later versions add type and scale.
    let (sensor_type, scale) = match *rest {
        [] => (SensorType::General, 0),
        [kind] => (SensorType::from_byte(kind), 0),
        [kind, properties, ..] => (SensorType::from_byte(kind), (properties >> 3) & 0b11),
    };
    Ok(ZWaveCommand::SensorMultilevelGet(SensorMultilevelGet { sensor_type, scale }))
}

pub(super) fn decode_report(rest: &[u8]) -> Result<ZWaveCommand> {
    let Some((&kind, value_bytes)) = rest.split_first() else {
        return Err(DecodeError::short("sensor report", 3, rest.len()));
    };
    let (value, _) = ScaledValue::decode(value_bytes)?;
    Ok(ZWaveCommand::SensorMultilevelReport(SensorMultilevelReport {
        sensor_type: SensorType::from_byte(kind),
        value,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_report() {
        // type=air temperature, precision=1, size=2, value=200 -> 20
        let body = [0x31, 0x05, 0x01, 0b001_00_010, 0x00, 0xC8];
        let ZWaveCommand::SensorMultilevelReport(report) = ZWaveCommand::decode(&body).unwrap()
        else {
            panic!("expected sensor report");
        };
        assert_eq!(report.sensor_type, SensorType::Temperature);
        assert_eq!(report.level(), 20);
        assert_eq!(report.value.precision, 1);
        assert_eq!(report.value.scale, 0);
        assert_eq!(report.value.value, 200);
    }

    #[test]
    fn report_round_trip() {
        let report = SensorMultilevelReport {
            sensor_type: SensorType::Humidity,
            value: ScaledValue { precision: 0, scale: 0, size: 1, value: 45 },
        };
        let bytes = ZWaveCommand::SensorMultilevelReport(report).to_bytes();
        assert_eq!(
            ZWaveCommand::decode(&bytes).unwrap(),
            ZWaveCommand::SensorMultilevelReport(report)
        );
    }

    #[test]
    fn oversized_size_field_is_rejected() {
        let body = [0x31, 0x05, 0x01, 0b000_00_101, 0x00];
        assert!(ZWaveCommand::decode(&body).is_err());
    }
}
