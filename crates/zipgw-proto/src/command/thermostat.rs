//! The thermostat family: Mode (0x40), Setpoint (0x43), Fan Mode (0x44),
//! Fan State (0x45) and Setback (0x47).

use serde::{Deserialize, Serialize};

#[cfg(test)]
use crate::command::ZWaveCommand;
use crate::errors::{DecodeError, Result};
use crate::values::ScaledValue;

/// Thermostat operating mode (low five bits of the wire byte).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum ThermostatMode {
    Off,
    Heat,
    Cool,
    Auto,
    AuxHeat,
    Resume,
    Fan,
    Furnace,
    DryAir,
    MoistAir,
    AutoChangeover,
    EnergyHeat,
    EnergyCool,
    Away,
    Unknown(u8),
}

impl ThermostatMode {
    /// Interpret a wire byte (total).
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        match byte & 0x1F {
            0x00 => Self::Off,
            0x01 => Self::Heat,
            0x02 => Self::Cool,
            0x03 => Self::Auto,
            0x04 => Self::AuxHeat,
            0x05 => Self::Resume,
            0x06 => Self::Fan,
            0x07 => Self::Furnace,
            0x08 => Self::DryAir,
            0x09 => Self::MoistAir,
            0x0A => Self::AutoChangeover,
            0x0B => Self::EnergyHeat,
            0x0C => Self::EnergyCool,
            0x0D => Self::Away,
            other => Self::Unknown(other),
        }
    }

    /// Map back to the wire byte.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::Off => 0x00,
            Self::Heat => 0x01,
            Self::Cool => 0x02,
            Self::Auto => 0x03,
            Self::AuxHeat => 0x04,
            Self::Resume => 0x05,
            Self::Fan => 0x06,
            Self::Furnace => 0x07,
            Self::DryAir => 0x08,
            Self::MoistAir => 0x09,
            Self::AutoChangeover => 0x0A,
            Self::EnergyHeat => 0x0B,
            Self::EnergyCool => 0x0C,
            Self::Away => 0x0D,
            Self::Unknown(other) => other,
        }
    }
}

/// Setpoint selector (low four bits of the wire byte).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum SetpointType {
    Heating,
    Cooling,
    Furnace,
    DryAir,
    MoistAir,
    AutoChangeover,
    EnergySaveHeating,
    EnergySaveCooling,
    AwayHeating,
    Unknown(u8),
}

impl SetpointType {
    /// Interpret a wire byte (total).
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        match byte & 0x0F {
            0x01 => Self::Heating,
            0x02 => Self::Cooling,
            0x07 => Self::Furnace,
            0x08 => Self::DryAir,
            0x09 => Self::MoistAir,
            0x0A => Self::AutoChangeover,
            0x0B => Self::EnergySaveHeating,
            0x0C => Self::EnergySaveCooling,
            0x0D => Self::AwayHeating,
            other => Self::Unknown(other),
        }
    }

    /// Map back to the wire byte.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::Heating => 0x01,
            Self::Cooling => 0x02,
            Self::Furnace => 0x07,
            Self::DryAir => 0x08,
            Self::MoistAir => 0x09,
            Self::AutoChangeover => 0x0A,
            Self::EnergySaveHeating => 0x0B,
            Self::EnergySaveCooling => 0x0C,
            Self::AwayHeating => 0x0D,
            Self::Unknown(other) => other,
        }
    }
}

/// A setpoint with its temperature value; shared by set and report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setpoint {
    /// Which setpoint
    pub setpoint_type: SetpointType,
    /// Target temperature with precision/scale metadata
    pub value: ScaledValue,
}

/// Fan mode (low four bits; bit 7 turns the fan off entirely).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum FanMode {
    AutoLow,
    Low,
    AutoHigh,
    High,
    AutoMedium,
    Medium,
    Circulation,
    HumidityCirculation,
    Unknown(u8),
}

impl FanMode {
    /// Interpret a wire byte (total).
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        match byte & 0x0F {
            0x00 => Self::AutoLow,
            0x01 => Self::Low,
            0x02 => Self::AutoHigh,
            0x03 => Self::High,
            0x04 => Self::AutoMedium,
            0x05 => Self::Medium,
            0x06 => Self::Circulation,
            0x07 => Self::HumidityCirculation,
            other => Self::Unknown(other),
        }
    }

    /// Map back to the wire byte.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::AutoLow => 0x00,
            Self::Low => 0x01,
            Self::AutoHigh => 0x02,
            Self::High => 0x03,
            Self::AutoMedium => 0x04,
            Self::Medium => 0x05,
            Self::Circulation => 0x06,
            Self::HumidityCirculation => 0x07,
            Self::Unknown(other) => other,
        }
    }
}

/// Fan mode plus the v2 off bit; shared by set and report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanModeValue {
    /// Selected mode
    pub mode: FanMode,
    /// Fan is switched off entirely
    pub off: bool,
}

/// Fan state (low four bits of the wire byte).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum FanState {
    Idle,
    Running,
    RunningHigh,
    RunningMedium,
    Circulation,
    HumidityCirculation,
    RightLeftCirculation,
    QuietCirculation,
    Unknown(u8),
}

impl FanState {
    /// Interpret a wire byte (total).
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        match byte & 0x0F {
            0x00 => Self::Idle,
            0x01 => Self::Running,
            0x02 => Self::RunningHigh,
            0x03 => Self::RunningMedium,
            0x04 => Self::Circulation,
            0x05 => Self::HumidityCirculation,
            0x06 => Self::RightLeftCirculation,
            0x07 => Self::QuietCirculation,
            other => Self::Unknown(other),
        }
    }

    /// Map back to the wire byte.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::Idle => 0x00,
            Self::Running => 0x01,
            Self::RunningHigh => 0x02,
            Self::RunningMedium => 0x03,
            Self::Circulation => 0x04,
            Self::HumidityCirculation => 0x05,
            Self::RightLeftCirculation => 0x06,
            Self::QuietCirculation => 0x07,
            Self::Unknown(other) => other,
        }
    }
}

/// Setback scope (low two bits of the wire byte).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum SetbackType {
    None,
    Temporary,
    Permanent,
    Unknown(u8),
}

impl SetbackType {
    const fn from_byte(byte: u8) -> Self {
        match byte & 0b11 {
            0x00 => Self::None,
            0x01 => Self::Temporary,
            0x02 => Self::Permanent,
            other => Self::Unknown(other),
        }
    }

    const fn to_byte(self) -> u8 {
        match self {
            Self::None => 0x00,
            Self::Temporary => 0x01,
            Self::Permanent => 0x02,
            Self::Unknown(other) => other,
        }
    }
}

/// Setback amount: signed tenths of a degree, or one of the named states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetbackState {
    /// Offset in tenths of a Kelvin, -128..=120
    Degrees(i8),
    /// 0x79
    FrostProtection,
    /// 0x7A
    EnergySaving,
    /// 0x7F
    Unused,
}

impl SetbackState {
    /// Interpret a wire byte (total).
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            0x79 => Self::FrostProtection,
            0x7A => Self::EnergySaving,
            0x7F => Self::Unused,
            other => Self::Degrees(other as i8),
        }
    }

    /// Map back to the wire byte.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::Degrees(tenths) => tenths as u8,
            Self::FrostProtection => 0x79,
            Self::EnergySaving => 0x7A,
            Self::Unused => 0x7F,
        }
    }
}

/// Setback scope plus amount; shared by set and report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setback {
    /// Scope of the setback
    pub setback_type: SetbackType,
    /// Amount
    pub state: SetbackState,
}

impl Setpoint {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        dst.push(self.setpoint_type.to_byte());
        self.value.encode(dst);
    }
}

impl FanModeValue {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        dst.push(u8::from(self.off) << 7 | self.mode.to_byte());
    }
}

impl Setback {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        dst.extend_from_slice(&[self.setback_type.to_byte(), self.state.to_byte()]);
    }
}

/// Mode report and set share the one-byte layout. Trailing bytes (optional
/// manufacturer data on v3 reports) are deliberately ignored.
pub(super) fn decode_mode_byte(rest: &[u8], context: &'static str) -> Result<ThermostatMode> {
    let Some(&byte) = rest.first() else {
        return Err(DecodeError::short(context, 1, 0));
    };
    Ok(ThermostatMode::from_byte(byte))
}

pub(super) fn decode_setpoint(rest: &[u8], context: &'static str) -> Result<Setpoint> {
    let Some((&kind, value_bytes)) = rest.split_first() else {
        return Err(DecodeError::short(context, 3, rest.len()));
    };
    let (value, _) = ScaledValue::decode(value_bytes)?;
    Ok(Setpoint { setpoint_type: SetpointType::from_byte(kind), value })
}

pub(super) fn decode_setpoint_type(rest: &[u8]) -> Result<SetpointType> {
    let Some(&byte) = rest.first() else {
        return Err(DecodeError::short("setpoint get", 1, 0));
    };
    Ok(SetpointType::from_byte(byte))
}

pub(super) fn decode_fan_mode(rest: &[u8], context: &'static str) -> Result<FanModeValue> {
    let Some(&byte) = rest.first() else {
        return Err(DecodeError::short(context, 1, 0));
    };
    Ok(FanModeValue { mode: FanMode::from_byte(byte), off: byte & 0x80 != 0 })
}

pub(super) fn decode_fan_state(rest: &[u8]) -> Result<FanState> {
    let Some(&byte) = rest.first() else {
        return Err(DecodeError::short("fan state report", 1, 0));
    };
    Ok(FanState::from_byte(byte))
}

pub(super) fn decode_setback(rest: &[u8], context: &'static str) -> Result<Setback> {
    let [kind, state] = *rest else {
        return Err(DecodeError::short(context, 2, rest.len()));
    };
    Ok(Setback {
        setback_type: SetbackType::from_byte(kind),
        state: SetbackState::from_byte(state),
    })
}
