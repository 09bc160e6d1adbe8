//! Door Lock (0x62) and User Code (0x63).

use serde::{Deserialize, Serialize};

use crate::command::ZWaveCommand;
use crate::errors::{DecodeError, Result};

/// Door lock operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum DoorLockMode {
    Unsecured,
    UnsecuredTimeout,
    UnsecuredInside,
    UnsecuredInsideTimeout,
    UnsecuredOutside,
    UnsecuredOutsideTimeout,
    Secured,
    Unknown(u8),
}

impl DoorLockMode {
    /// Interpret a wire byte (total).
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            0x00 => Self::Unsecured,
            0x01 => Self::UnsecuredTimeout,
            0x10 => Self::UnsecuredInside,
            0x11 => Self::UnsecuredInsideTimeout,
            0x20 => Self::UnsecuredOutside,
            0x21 => Self::UnsecuredOutsideTimeout,
            0xFF => Self::Secured,
            other => Self::Unknown(other),
        }
    }

    /// Map back to the wire byte.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::Unsecured => 0x00,
            Self::UnsecuredTimeout => 0x01,
            Self::UnsecuredInside => 0x10,
            Self::UnsecuredInsideTimeout => 0x11,
            Self::UnsecuredOutside => 0x20,
            Self::UnsecuredOutsideTimeout => 0x21,
            Self::Secured => 0xFF,
            Self::Unknown(other) => other,
        }
    }
}

/// Current door lock state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorLockOperationReport {
    /// Lock mode
    pub mode: DoorLockMode,
    /// Enabled outside/inside handle bits (two nibbles)
    pub handles: u8,
    /// Door/bolt/latch condition bits
    pub condition: u8,
    /// Remaining lock timeout minutes, 0xFE when no timeout runs
    pub timeout_minutes: u8,
    /// Remaining lock timeout seconds, 0xFE when no timeout runs
    pub timeout_seconds: u8,
}

/// Status of a user code slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum UserIdStatus {
    Available,
    Occupied,
    ReservedByAdministrator,
    StatusNotAvailable,
    Unknown(u8),
}

impl UserIdStatus {
    const fn from_byte(byte: u8) -> Self {
        match byte {
            0x00 => Self::Available,
            0x01 => Self::Occupied,
            0x02 => Self::ReservedByAdministrator,
            0xFE => Self::StatusNotAvailable,
            other => Self::Unknown(other),
        }
    }

    const fn to_byte(self) -> u8 {
        match self {
            Self::Available => 0x00,
            Self::Occupied => 0x01,
            Self::ReservedByAdministrator => 0x02,
            Self::StatusNotAvailable => 0xFE,
            Self::Unknown(other) => other,
        }
    }
}

/// A user code slot; shared by set and report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCode {
    /// Slot number, 1-based
    pub user_id: u8,
    /// Slot status
    pub status: UserIdStatus,
    /// ASCII digits of the code (4..=10 on real devices)
    pub code: Vec<u8>,
}

impl DoorLockOperationReport {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        dst.extend_from_slice(&[
            self.mode.to_byte(),
            self.handles,
            self.condition,
            self.timeout_minutes,
            self.timeout_seconds,
        ]);
    }
}

impl UserCode {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        dst.push(self.user_id);
        dst.push(self.status.to_byte());
        dst.extend_from_slice(&self.code);
    }
}

pub(super) fn decode_door_lock_mode(rest: &[u8]) -> Result<DoorLockMode> {
    let Some(&byte) = rest.first() else {
        return Err(DecodeError::short("door lock operation set", 1, 0));
    };
    Ok(DoorLockMode::from_byte(byte))
}

pub(super) fn decode_operation_report(rest: &[u8]) -> Result<ZWaveCommand> {
    if rest.len() < 5 {
        return Err(DecodeError::short("door lock operation report", 5, rest.len()));
    }
    Ok(ZWaveCommand::DoorLockOperationReport(DoorLockOperationReport {
        mode: DoorLockMode::from_byte(rest[0]),
        handles: rest[1],
        condition: rest[2],
        timeout_minutes: rest[3],
        timeout_seconds: rest[4],
    }))
}

pub(super) fn decode_user_code(rest: &[u8], context: &'static str) -> Result<UserCode> {
    if rest.len() < 2 {
        return Err(DecodeError::short(context, 2, rest.len()));
    }
    Ok(UserCode {
        user_id: rest[0],
        status: UserIdStatus::from_byte(rest[1]),
        code: rest[2..].to_vec(),
    })
}

pub(super) fn decode_user_code_get(rest: &[u8]) -> Result<u8> {
    let Some(&user_id) = rest.first() else {
        return Err(DecodeError::short("user code get", 1, 0));
    };
    Ok(user_id)
}

pub(super) fn decode_users_number_report(rest: &[u8]) -> Result<u8> {
    let Some(&supported) = rest.first() else {
        return Err(DecodeError::short("users number report", 1, 0));
    };
    Ok(supported)
}
