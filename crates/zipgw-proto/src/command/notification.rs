//! Notification (0x71), including the legacy alarm form.
//!
//! A v3+ report leads with three zero bytes (the legacy alarm fields plus a
//! reserved byte) before the typed notification fields. Reports where those
//! bytes are non-zero are v1 alarm frames and decode to the raw
//! type/level pair instead.

use serde::{Deserialize, Serialize};

use crate::command::ZWaveCommand;
use crate::errors::{DecodeError, Result};
use crate::registry::{NotificationState, NotificationType};

/// A typed notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationReport {
    /// 0xFF when the notification source is active, 0x00 when disabled
    pub status: u8,
    /// What kind of event
    pub notification_type: NotificationType,
    /// The event itself, scoped by the type
    pub state: NotificationState,
}

/// A legacy v1 alarm report: raw bytes, semantics are device-specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmReport {
    /// Device-specific alarm type
    pub alarm_type: u8,
    /// Device-specific alarm level
    pub alarm_level: u8,
}

impl NotificationReport {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        dst.extend_from_slice(&[
            0x00,
            0x00,
            0x00,
            self.status,
            self.notification_type.to_byte(),
            self.state.to_byte(),
        ]);
    }
}

impl AlarmReport {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        dst.extend_from_slice(&[self.alarm_type, self.alarm_level]);
    }
}

pub(super) fn decode_report(rest: &[u8]) -> Result<ZWaveCommand> {
    if rest.len() >= 6 && rest[0] == 0 && rest[1] == 0 && rest[2] == 0 {
        let notification_type = NotificationType::from_byte(rest[4]);
        return Ok(ZWaveCommand::NotificationReport(NotificationReport {
            status: rest[3],
            notification_type,
            state: NotificationState::from_bytes(notification_type, rest[5]),
        }));
    }

    let [alarm_type, alarm_level, ..] = *rest else {
        return Err(DecodeError::short("notification report", 2, rest.len()));
    };
    Ok(ZWaveCommand::AlarmReport(AlarmReport { alarm_type, alarm_level }))
}
