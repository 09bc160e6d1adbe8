//! Z-Wave command bodies: one module per command-class family, one tagged
//! enum tying them together.
//!
//! # Dispatch
//!
//! [`ZWaveCommand::decode`] switches on the `(command_class, command)` byte
//! pair. Known pairs go to their family decoder; everything else lands in
//! [`ZWaveCommand::Raw`] with the registry symbols and the untouched
//! payload. Decoding only fails on *structurally malformed* known commands
//! (truncated fields, invalid declared sizes) - never on unknown ones.
//!
//! # Symmetry
//!
//! Every variant also encodes, so request/report pairs round-trip and test
//! gateways can fabricate any frame the client can parse. All methods use
//! exhaustive matches: adding a variant without wiring it up is a compile
//! error, not a silent gap.

pub mod access;
pub mod association;
pub mod configuration;
pub mod device_info;
pub mod inclusion;
pub mod mailbox;
pub mod management;
pub mod meter;
pub mod notification;
pub mod proxy;
pub mod sensor;
pub mod switch;
pub mod thermostat;
pub mod wake_up;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::errors::{DecodeError, Result};
use crate::registry::{
    encode_command_class_list, BasicDeviceClass, CommandClass, CommandId, GenericDeviceClass,
    SpecificDeviceClass,
};

/// Device classes and supported command classes from a node information
/// frame, as carried by inclusion and node-info-cache reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    /// Node is always listening (mains powered)
    pub listening: bool,
    /// Basic device class
    pub basic_class: BasicDeviceClass,
    /// Generic device class
    pub generic_class: GenericDeviceClass,
    /// Specific device class, scoped by the generic one
    pub specific_class: SpecificDeviceClass,
    /// Supported command classes, in wire order
    pub command_classes: Vec<CommandClass>,
}

impl NodeInfo {
    /// Encode as the wire node-info block (length byte counts itself).
    pub(crate) fn encode(&self, dst: &mut Vec<u8>) {
        let classes = encode_command_class_list(&self.command_classes);
        dst.push(6 + classes.len() as u8);
        dst.push(u8::from(self.listening) << 7);
        dst.push(0x00);
        dst.push(self.basic_class.to_byte());
        dst.push(self.generic_class.to_byte());
        dst.push(self.specific_class.to_byte());
        dst.extend_from_slice(&classes);
    }
}

/// A command this crate has no dedicated decoder for.
///
/// The registry still names the class and command where it can; the payload
/// is carried verbatim so nothing is lost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCommand {
    /// Command class, `Unknown(byte)` if the registry does not know it
    pub command_class: CommandClass,
    /// Command, `Unknown(byte)` if the registry does not know the pair
    pub command: CommandId,
    /// Payload bytes after the two id bytes, untouched
    pub value: Bytes,
}

/// A decoded Z-Wave command body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum ZWaveCommand {
    // Network Management Inclusion (0x34)
    NodeAdd(inclusion::NodeAdd),
    NodeAddStatus(inclusion::NodeAddStatus),
    NodeRemove(inclusion::NodeRemove),
    NodeRemoveStatus(inclusion::NodeRemoveStatus),
    NodeNeighborUpdateRequest(inclusion::NodeNeighborUpdateRequest),
    NodeNeighborUpdateStatus(inclusion::NodeNeighborUpdateStatus),
    NodeAddKeysReport(inclusion::NodeAddKeysReport),
    NodeAddKeysSet(inclusion::NodeAddKeysSet),
    NodeAddDskReport(inclusion::NodeAddDskReport),
    NodeAddDskSet(inclusion::NodeAddDskSet),

    // Network Management Basic (0x4D)
    LearnModeSet(management::LearnModeSet),
    LearnModeSetStatus(management::LearnModeSetStatus),
    DefaultSet(management::DefaultSet),
    DefaultSetComplete(management::DefaultSetComplete),

    // Network Management Proxy (0x52)
    NodeListGet(proxy::NodeListGet),
    NodeListReport(proxy::NodeListReport),
    NodeInfoCachedGet(proxy::NodeInfoCachedGet),
    NodeInfoCacheReport(proxy::NodeInfoCacheReport),

    // Basic (0x20) and switches (0x25, 0x26)
    BasicSet(switch::BinaryValue),
    BasicGet,
    BasicReport(switch::BinaryValue),
    SwitchBinarySet(switch::BinaryValue),
    SwitchBinaryGet,
    SwitchBinaryReport(switch::BinaryValue),
    SwitchMultilevelSet(switch::SwitchLevel),
    SwitchMultilevelGet,
    SwitchMultilevelReport(switch::SwitchLevel),

    // Multilevel Sensor (0x31)
    SensorMultilevelGet(sensor::SensorMultilevelGet),
    SensorMultilevelReport(sensor::SensorMultilevelReport),

    // Meter (0x32) and Battery (0x80)
    MeterGet(meter::MeterGet),
    MeterReport(meter::MeterReport),
    BatteryGet,
    BatteryReport(meter::BatteryReport),

    // Thermostat family (0x40, 0x43, 0x44, 0x45, 0x47)
    ThermostatModeSet(thermostat::ThermostatMode),
    ThermostatModeGet,
    ThermostatModeReport(thermostat::ThermostatMode),
    ThermostatSetpointSet(thermostat::Setpoint),
    ThermostatSetpointGet(thermostat::SetpointType),
    ThermostatSetpointReport(thermostat::Setpoint),
    ThermostatFanModeSet(thermostat::FanModeValue),
    ThermostatFanModeGet,
    ThermostatFanModeReport(thermostat::FanModeValue),
    ThermostatFanStateGet,
    ThermostatFanStateReport(thermostat::FanState),
    ThermostatSetbackSet(thermostat::Setback),
    ThermostatSetbackGet,
    ThermostatSetbackReport(thermostat::Setback),

    // Door Lock (0x62) and User Code (0x63)
    DoorLockOperationSet(access::DoorLockMode),
    DoorLockOperationGet,
    DoorLockOperationReport(access::DoorLockOperationReport),
    UserCodeSet(access::UserCode),
    UserCodeGet { user_id: u8 },
    UserCodeReport(access::UserCode),
    UsersNumberGet,
    UsersNumberReport { supported_users: u8 },

    // Configuration (0x70)
    ConfigurationSet(configuration::ConfigurationValue),
    ConfigurationGet { parameter: u8 },
    ConfigurationReport(configuration::ConfigurationValue),
    ConfigurationBulkGet { parameter_offset: u16, count: u8 },
    ConfigurationBulkReport(configuration::ConfigurationBulkReport),

    // Notification (0x71)
    NotificationReport(notification::NotificationReport),
    AlarmReport(notification::AlarmReport),

    // Manufacturer Specific (0x72), Version (0x86), Firmware MD (0x7A)
    ManufacturerSpecificGet,
    ManufacturerSpecificReport(device_info::ManufacturerSpecificReport),
    DeviceSpecificGet { id_type: device_info::DeviceIdType },
    DeviceSpecificReport(device_info::DeviceSpecificReport),
    VersionCommandClassGet { class: CommandClass },
    VersionCommandClassReport { class: CommandClass, version: u8 },
    FirmwareMdGet,
    FirmwareMdReport(device_info::FirmwareMdReport),

    // Mailbox (0x69)
    MailboxConfigurationGet,
    MailboxConfigurationReport(mailbox::MailboxConfigurationReport),

    // Wake Up (0x84)
    WakeUpIntervalSet(wake_up::WakeUpInterval),
    WakeUpIntervalGet,
    WakeUpIntervalReport(wake_up::WakeUpInterval),
    WakeUpNoMoreInformation,
    WakeUpIntervalCapabilitiesGet,
    WakeUpIntervalCapabilitiesReport(wake_up::WakeUpIntervalCapabilities),

    // Association (0x85)
    AssociationSet(association::AssociationMembers),
    AssociationGet { group: u8 },
    AssociationReport(association::AssociationReport),
    AssociationRemove(association::AssociationMembers),

    /// Fallback for every pair without a dedicated decoder
    Raw(RawCommand),
}

impl ZWaveCommand {
    /// Decode a command body (`[command_class, command, payload...]`).
    ///
    /// # Errors
    ///
    /// Fails only on bodies shorter than the two id bytes and on
    /// structurally malformed *known* commands. Unknown commands succeed as
    /// [`ZWaveCommand::Raw`].
    pub fn decode(body: &[u8]) -> Result<Self> {
        if body.len() < 2 {
            return Err(DecodeError::short("command ids", 2, body.len()));
        }
        let (cc, cmd) = (body[0], body[1]);
        let rest = &body[2..];

        match (cc, cmd) {
            (0x34, 0x01) => inclusion::decode_node_add(rest),
            (0x34, 0x02) => inclusion::decode_node_add_status(rest),
            (0x34, 0x03) => inclusion::decode_node_remove(rest),
            (0x34, 0x04) => inclusion::decode_node_remove_status(rest),
            (0x34, 0x0B) => inclusion::decode_node_neighbor_update_request(rest),
            (0x34, 0x0C) => inclusion::decode_node_neighbor_update_status(rest),
            (0x34, 0x11) => inclusion::decode_node_add_keys_report(rest),
            (0x34, 0x12) => inclusion::decode_node_add_keys_set(rest),
            (0x34, 0x13) => inclusion::decode_node_add_dsk_report(rest),
            (0x34, 0x14) => inclusion::decode_node_add_dsk_set(rest),

            (0x4D, 0x01) => management::decode_learn_mode_set(rest),
            (0x4D, 0x02) => management::decode_learn_mode_set_status(rest),
            (0x4D, 0x06) => management::decode_default_set(rest),
            (0x4D, 0x07) => management::decode_default_set_complete(rest),

            (0x52, 0x01) => proxy::decode_node_list_get(rest),
            (0x52, 0x02) => proxy::decode_node_list_report(rest),
            (0x52, 0x03) => proxy::decode_node_info_cached_get(rest),
            (0x52, 0x04) => proxy::decode_node_info_cache_report(rest),

            (0x20, 0x01) => {
                Ok(Self::BasicSet(switch::decode_binary_byte(rest, "basic set")?))
            }
            (0x20, 0x02) => Ok(Self::BasicGet),
            (0x20, 0x03) => {
                Ok(Self::BasicReport(switch::decode_binary_byte(rest, "basic report")?))
            }
            (0x25, 0x01) => {
                Ok(Self::SwitchBinarySet(switch::decode_binary_byte(rest, "switch set")?))
            }
            (0x25, 0x02) => Ok(Self::SwitchBinaryGet),
            (0x25, 0x03) => {
                Ok(Self::SwitchBinaryReport(switch::decode_binary_byte(rest, "switch report")?))
            }
            (0x26, 0x01) => {
                Ok(Self::SwitchMultilevelSet(switch::decode_level_byte(rest, "level set")?))
            }
            (0x26, 0x02) => Ok(Self::SwitchMultilevelGet),
            (0x26, 0x03) => {
                Ok(Self::SwitchMultilevelReport(switch::decode_level_byte(rest, "level report")?))
            }

            (0x31, 0x04) => sensor::decode_get(rest),
            (0x31, 0x05) => sensor::decode_report(rest),

            (0x32, 0x01) => meter::decode_meter_get(rest),
            (0x32, 0x02) => meter::decode_meter_report(rest),
            (0x80, 0x02) => Ok(Self::BatteryGet),
            (0x80, 0x03) => meter::decode_battery_report(rest),

            (0x40, 0x01) => {
                Ok(Self::ThermostatModeSet(thermostat::decode_mode_byte(rest, "mode set")?))
            }
            (0x40, 0x02) => Ok(Self::ThermostatModeGet),
            (0x40, 0x03) => {
                Ok(Self::ThermostatModeReport(thermostat::decode_mode_byte(rest, "mode report")?))
            }
            (0x43, 0x01) => {
                Ok(Self::ThermostatSetpointSet(thermostat::decode_setpoint(rest, "setpoint set")?))
            }
            (0x43, 0x02) => Ok(Self::ThermostatSetpointGet(thermostat::decode_setpoint_type(rest)?)),
            (0x43, 0x03) => Ok(Self::ThermostatSetpointReport(thermostat::decode_setpoint(
                rest,
                "setpoint report",
            )?)),
            (0x44, 0x01) => {
                Ok(Self::ThermostatFanModeSet(thermostat::decode_fan_mode(rest, "fan mode set")?))
            }
            (0x44, 0x02) => Ok(Self::ThermostatFanModeGet),
            (0x44, 0x03) => Ok(Self::ThermostatFanModeReport(thermostat::decode_fan_mode(
                rest,
                "fan mode report",
            )?)),
            (0x45, 0x02) => Ok(Self::ThermostatFanStateGet),
            (0x45, 0x03) => Ok(Self::ThermostatFanStateReport(thermostat::decode_fan_state(rest)?)),
            (0x47, 0x01) => {
                Ok(Self::ThermostatSetbackSet(thermostat::decode_setback(rest, "setback set")?))
            }
            (0x47, 0x02) => Ok(Self::ThermostatSetbackGet),
            (0x47, 0x03) => Ok(Self::ThermostatSetbackReport(thermostat::decode_setback(
                rest,
                "setback report",
            )?)),

            (0x62, 0x01) => Ok(Self::DoorLockOperationSet(access::decode_door_lock_mode(rest)?)),
            (0x62, 0x02) => Ok(Self::DoorLockOperationGet),
            (0x62, 0x03) => access::decode_operation_report(rest),
            (0x63, 0x01) => Ok(Self::UserCodeSet(access::decode_user_code(rest, "user code set")?)),
            (0x63, 0x02) => Ok(Self::UserCodeGet { user_id: access::decode_user_code_get(rest)? }),
            (0x63, 0x03) => {
                Ok(Self::UserCodeReport(access::decode_user_code(rest, "user code report")?))
            }
            (0x63, 0x04) => Ok(Self::UsersNumberGet),
            (0x63, 0x05) => Ok(Self::UsersNumberReport {
                supported_users: access::decode_users_number_report(rest)?,
            }),

            (0x70, 0x04) => Ok(Self::ConfigurationSet(configuration::decode_value(
                rest,
                "configuration set",
            )?)),
            (0x70, 0x05) => Ok(Self::ConfigurationGet { parameter: configuration::decode_get(rest)? }),
            (0x70, 0x06) => Ok(Self::ConfigurationReport(configuration::decode_value(
                rest,
                "configuration report",
            )?)),
            (0x70, 0x07) => configuration::decode_bulk_get(rest),
            (0x70, 0x09) => configuration::decode_bulk_report(rest),

            (0x71, 0x05) => notification::decode_report(rest),

            (0x72, 0x04) => Ok(Self::ManufacturerSpecificGet),
            (0x72, 0x05) => device_info::decode_manufacturer_report(rest),
            (0x72, 0x06) => device_info::decode_device_specific_get(rest),
            (0x72, 0x07) => device_info::decode_device_specific_report(rest),
            (0x86, 0x13) => device_info::decode_version_cc_get(rest),
            (0x86, 0x14) => device_info::decode_version_cc_report(rest),
            (0x7A, 0x01) => Ok(Self::FirmwareMdGet),
            (0x7A, 0x02) => device_info::decode_firmware_md_report(rest),

            (0x69, 0x01) => Ok(Self::MailboxConfigurationGet),
            (0x69, 0x03) => mailbox::decode_configuration_report(rest),

            (0x84, 0x04) => Ok(Self::WakeUpIntervalSet(wake_up::decode_interval(
                rest,
                "wake up interval set",
            )?)),
            (0x84, 0x05) => Ok(Self::WakeUpIntervalGet),
            (0x84, 0x06) => Ok(Self::WakeUpIntervalReport(wake_up::decode_interval(
                rest,
                "wake up interval report",
            )?)),
            (0x84, 0x08) => Ok(Self::WakeUpNoMoreInformation),
            (0x84, 0x09) => Ok(Self::WakeUpIntervalCapabilitiesGet),
            (0x84, 0x0A) => wake_up::decode_capabilities(rest),

            (0x85, 0x01) => {
                Ok(Self::AssociationSet(association::decode_members(rest, "association set")?))
            }
            (0x85, 0x02) => Ok(Self::AssociationGet { group: association::decode_get(rest)? }),
            (0x85, 0x03) => association::decode_report(rest),
            (0x85, 0x04) => Ok(Self::AssociationRemove(association::decode_members(
                rest,
                "association remove",
            )?)),

            _ => {
                let command_class = CommandClass::from_byte(cc);
                Ok(Self::Raw(RawCommand {
                    command_class,
                    command: CommandId::from_bytes(command_class, cmd),
                    value: Bytes::copy_from_slice(rest),
                }))
            }
        }
    }

    /// Append the wire form (`[command_class, command, payload...]`).
    pub fn encode(&self, dst: &mut Vec<u8>) {
        let (cc, cmd) = self.wire_ids();
        dst.push(cc);
        dst.push(cmd);
        match self {
            Self::NodeAdd(c) => c.encode_payload(dst),
            Self::NodeAddStatus(c) => c.encode_payload(dst),
            Self::NodeRemove(c) => c.encode_payload(dst),
            Self::NodeRemoveStatus(c) => c.encode_payload(dst),
            Self::NodeNeighborUpdateRequest(c) => c.encode_payload(dst),
            Self::NodeNeighborUpdateStatus(c) => c.encode_payload(dst),
            Self::NodeAddKeysReport(c) => c.encode_payload(dst),
            Self::NodeAddKeysSet(c) => c.encode_payload(dst),
            Self::NodeAddDskReport(c) => c.encode_payload(dst),
            Self::NodeAddDskSet(c) => c.encode_payload(dst),

            Self::LearnModeSet(c) => c.encode_payload(dst),
            Self::LearnModeSetStatus(c) => c.encode_payload(dst),
            Self::DefaultSet(c) => c.encode_payload(dst),
            Self::DefaultSetComplete(c) => c.encode_payload(dst),

            Self::NodeListGet(c) => c.encode_payload(dst),
            Self::NodeListReport(c) => c.encode_payload(dst),
            Self::NodeInfoCachedGet(c) => c.encode_payload(dst),
            Self::NodeInfoCacheReport(c) => c.encode_payload(dst),

            Self::BasicSet(v) | Self::BasicReport(v) => dst.push(v.to_byte()),
            Self::SwitchBinarySet(v) | Self::SwitchBinaryReport(v) => dst.push(v.to_byte()),
            Self::SwitchMultilevelSet(v) | Self::SwitchMultilevelReport(v) => {
                dst.push(v.to_byte());
            }

            Self::SensorMultilevelGet(c) => c.encode_payload(dst),
            Self::SensorMultilevelReport(c) => c.encode_payload(dst),

            Self::MeterGet(c) => c.encode_payload(dst),
            Self::MeterReport(c) => c.encode_payload(dst),
            Self::BatteryReport(c) => c.encode_payload(dst),

            Self::ThermostatModeSet(mode) | Self::ThermostatModeReport(mode) => {
                dst.push(mode.to_byte());
            }
            Self::ThermostatSetpointSet(c) | Self::ThermostatSetpointReport(c) => {
                c.encode_payload(dst);
            }
            Self::ThermostatSetpointGet(kind) => dst.push(kind.to_byte()),
            Self::ThermostatFanModeSet(c) | Self::ThermostatFanModeReport(c) => {
                c.encode_payload(dst);
            }
            Self::ThermostatFanStateReport(state) => dst.push(state.to_byte()),
            Self::ThermostatSetbackSet(c) | Self::ThermostatSetbackReport(c) => {
                c.encode_payload(dst);
            }

            Self::DoorLockOperationSet(mode) => dst.push(mode.to_byte()),
            Self::DoorLockOperationReport(c) => c.encode_payload(dst),
            Self::UserCodeSet(c) | Self::UserCodeReport(c) => c.encode_payload(dst),
            Self::UserCodeGet { user_id } => dst.push(*user_id),
            Self::UsersNumberReport { supported_users } => dst.push(*supported_users),

            Self::ConfigurationSet(c) | Self::ConfigurationReport(c) => c.encode_payload(dst),
            Self::ConfigurationGet { parameter } => dst.push(*parameter),
            Self::ConfigurationBulkGet { parameter_offset, count } => {
                dst.extend_from_slice(&parameter_offset.to_be_bytes());
                dst.push(*count);
            }
            Self::ConfigurationBulkReport(c) => c.encode_payload(dst),

            Self::NotificationReport(c) => c.encode_payload(dst),
            Self::AlarmReport(c) => c.encode_payload(dst),

            Self::ManufacturerSpecificReport(c) => c.encode_payload(dst),
            Self::DeviceSpecificGet { id_type } => dst.push(id_type.to_byte()),
            Self::DeviceSpecificReport(c) => c.encode_payload(dst),
            Self::VersionCommandClassGet { class } => dst.push(class.to_byte()),
            Self::VersionCommandClassReport { class, version } => {
                dst.push(class.to_byte());
                dst.push(*version);
            }
            Self::FirmwareMdReport(c) => c.encode_payload(dst),

            Self::MailboxConfigurationReport(c) => c.encode_payload(dst),

            Self::WakeUpIntervalSet(c) | Self::WakeUpIntervalReport(c) => c.encode_payload(dst),
            Self::WakeUpIntervalCapabilitiesReport(c) => c.encode_payload(dst),

            Self::AssociationSet(c) | Self::AssociationRemove(c) => c.encode_payload(dst),
            Self::AssociationGet { group } => dst.push(*group),
            Self::AssociationReport(c) => c.encode_payload(dst),

            Self::Raw(raw) => dst.extend_from_slice(&raw.value),

            // Bare gets carry no payload.
            Self::BasicGet
            | Self::SwitchBinaryGet
            | Self::SwitchMultilevelGet
            | Self::BatteryGet
            | Self::ThermostatModeGet
            | Self::ThermostatFanModeGet
            | Self::ThermostatFanStateGet
            | Self::ThermostatSetbackGet
            | Self::DoorLockOperationGet
            | Self::UsersNumberGet
            | Self::ManufacturerSpecificGet
            | Self::FirmwareMdGet
            | Self::MailboxConfigurationGet
            | Self::WakeUpIntervalGet
            | Self::WakeUpNoMoreInformation
            | Self::WakeUpIntervalCapabilitiesGet => {}
        }
    }

    /// The wire form as a fresh buffer.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(16);
        self.encode(&mut out);
        out
    }

    /// The command class this body belongs to.
    #[must_use]
    pub fn command_class(&self) -> CommandClass {
        CommandClass::from_byte(self.wire_ids().0)
    }

    /// The network-management sequence number carried *inside* the body,
    /// for the command classes that have one.
    #[must_use]
    pub fn seq_no(&self) -> Option<u8> {
        match self {
            Self::NodeAdd(c) => Some(c.seq_no),
            Self::NodeAddStatus(c) => Some(c.seq_no),
            Self::NodeRemove(c) => Some(c.seq_no),
            Self::NodeRemoveStatus(c) => Some(c.seq_no),
            Self::NodeNeighborUpdateRequest(c) => Some(c.seq_no),
            Self::NodeNeighborUpdateStatus(c) => Some(c.seq_no),
            Self::NodeAddKeysReport(c) => Some(c.seq_no),
            Self::NodeAddKeysSet(c) => Some(c.seq_no),
            Self::NodeAddDskReport(c) => Some(c.seq_no),
            Self::NodeAddDskSet(c) => Some(c.seq_no),
            Self::LearnModeSet(c) => Some(c.seq_no),
            Self::LearnModeSetStatus(c) => Some(c.seq_no),
            Self::DefaultSet(c) => Some(c.seq_no),
            Self::DefaultSetComplete(c) => Some(c.seq_no),
            Self::NodeListGet(c) => Some(c.seq_no),
            Self::NodeListReport(c) => Some(c.seq_no),
            Self::NodeInfoCachedGet(c) => Some(c.seq_no),
            Self::NodeInfoCacheReport(c) => Some(c.seq_no),
            _ => None,
        }
    }

    /// Stamp the network-management sequence number into the body, for the
    /// command classes that carry one. A no-op for the rest.
    pub fn set_seq_no(&mut self, seq_no: u8) {
        match self {
            Self::NodeAdd(c) => c.seq_no = seq_no,
            Self::NodeAddStatus(c) => c.seq_no = seq_no,
            Self::NodeRemove(c) => c.seq_no = seq_no,
            Self::NodeRemoveStatus(c) => c.seq_no = seq_no,
            Self::NodeNeighborUpdateRequest(c) => c.seq_no = seq_no,
            Self::NodeNeighborUpdateStatus(c) => c.seq_no = seq_no,
            Self::NodeAddKeysReport(c) => c.seq_no = seq_no,
            Self::NodeAddKeysSet(c) => c.seq_no = seq_no,
            Self::NodeAddDskReport(c) => c.seq_no = seq_no,
            Self::NodeAddDskSet(c) => c.seq_no = seq_no,
            Self::LearnModeSet(c) => c.seq_no = seq_no,
            Self::LearnModeSetStatus(c) => c.seq_no = seq_no,
            Self::DefaultSet(c) => c.seq_no = seq_no,
            Self::DefaultSetComplete(c) => c.seq_no = seq_no,
            Self::NodeListGet(c) => c.seq_no = seq_no,
            Self::NodeListReport(c) => c.seq_no = seq_no,
            Self::NodeInfoCachedGet(c) => c.seq_no = seq_no,
            Self::NodeInfoCacheReport(c) => c.seq_no = seq_no,
            _ => {}
        }
    }

    fn wire_ids(&self) -> (u8, u8) {
        match self {
            Self::NodeAdd(_) => (0x34, 0x01),
            Self::NodeAddStatus(_) => (0x34, 0x02),
            Self::NodeRemove(_) => (0x34, 0x03),
            Self::NodeRemoveStatus(_) => (0x34, 0x04),
            Self::NodeNeighborUpdateRequest(_) => (0x34, 0x0B),
            Self::NodeNeighborUpdateStatus(_) => (0x34, 0x0C),
            Self::NodeAddKeysReport(_) => (0x34, 0x11),
            Self::NodeAddKeysSet(_) => (0x34, 0x12),
            Self::NodeAddDskReport(_) => (0x34, 0x13),
            Self::NodeAddDskSet(_) => (0x34, 0x14),

            Self::LearnModeSet(_) => (0x4D, 0x01),
            Self::LearnModeSetStatus(_) => (0x4D, 0x02),
            Self::DefaultSet(_) => (0x4D, 0x06),
            Self::DefaultSetComplete(_) => (0x4D, 0x07),

            Self::NodeListGet(_) => (0x52, 0x01),
            Self::NodeListReport(_) => (0x52, 0x02),
            Self::NodeInfoCachedGet(_) => (0x52, 0x03),
            Self::NodeInfoCacheReport(_) => (0x52, 0x04),

            Self::BasicSet(_) => (0x20, 0x01),
            Self::BasicGet => (0x20, 0x02),
            Self::BasicReport(_) => (0x20, 0x03),
            Self::SwitchBinarySet(_) => (0x25, 0x01),
            Self::SwitchBinaryGet => (0x25, 0x02),
            Self::SwitchBinaryReport(_) => (0x25, 0x03),
            Self::SwitchMultilevelSet(_) => (0x26, 0x01),
            Self::SwitchMultilevelGet => (0x26, 0x02),
            Self::SwitchMultilevelReport(_) => (0x26, 0x03),

            Self::SensorMultilevelGet(_) => (0x31, 0x04),
            Self::SensorMultilevelReport(_) => (0x31, 0x05),

            Self::MeterGet(_) => (0x32, 0x01),
            Self::MeterReport(_) => (0x32, 0x02),
            Self::BatteryGet => (0x80, 0x02),
            Self::BatteryReport(_) => (0x80, 0x03),

            Self::ThermostatModeSet(_) => (0x40, 0x01),
            Self::ThermostatModeGet => (0x40, 0x02),
            Self::ThermostatModeReport(_) => (0x40, 0x03),
            Self::ThermostatSetpointSet(_) => (0x43, 0x01),
            Self::ThermostatSetpointGet(_) => (0x43, 0x02),
            Self::ThermostatSetpointReport(_) => (0x43, 0x03),
            Self::ThermostatFanModeSet(_) => (0x44, 0x01),
            Self::ThermostatFanModeGet => (0x44, 0x02),
            Self::ThermostatFanModeReport(_) => (0x44, 0x03),
            Self::ThermostatFanStateGet => (0x45, 0x02),
            Self::ThermostatFanStateReport(_) => (0x45, 0x03),
            Self::ThermostatSetbackSet(_) => (0x47, 0x01),
            Self::ThermostatSetbackGet => (0x47, 0x02),
            Self::ThermostatSetbackReport(_) => (0x47, 0x03),

            Self::DoorLockOperationSet(_) => (0x62, 0x01),
            Self::DoorLockOperationGet => (0x62, 0x02),
            Self::DoorLockOperationReport(_) => (0x62, 0x03),
            Self::UserCodeSet(_) => (0x63, 0x01),
            Self::UserCodeGet { .. } => (0x63, 0x02),
            Self::UserCodeReport(_) => (0x63, 0x03),
            Self::UsersNumberGet => (0x63, 0x04),
            Self::UsersNumberReport { .. } => (0x63, 0x05),

            Self::ConfigurationSet(_) => (0x70, 0x04),
            Self::ConfigurationGet { .. } => (0x70, 0x05),
            Self::ConfigurationReport(_) => (0x70, 0x06),
            Self::ConfigurationBulkGet { .. } => (0x70, 0x07),
            Self::ConfigurationBulkReport(_) => (0x70, 0x09),

            Self::NotificationReport(_) | Self::AlarmReport(_) => (0x71, 0x05),

            Self::ManufacturerSpecificGet => (0x72, 0x04),
            Self::ManufacturerSpecificReport(_) => (0x72, 0x05),
            Self::DeviceSpecificGet { .. } => (0x72, 0x06),
            Self::DeviceSpecificReport(_) => (0x72, 0x07),
            Self::VersionCommandClassGet { .. } => (0x86, 0x13),
            Self::VersionCommandClassReport { .. } => (0x86, 0x14),
            Self::FirmwareMdGet => (0x7A, 0x01),
            Self::FirmwareMdReport(_) => (0x7A, 0x02),

            Self::MailboxConfigurationGet => (0x69, 0x01),
            Self::MailboxConfigurationReport(_) => (0x69, 0x03),

            Self::WakeUpIntervalSet(_) => (0x84, 0x04),
            Self::WakeUpIntervalGet => (0x84, 0x05),
            Self::WakeUpIntervalReport(_) => (0x84, 0x06),
            Self::WakeUpNoMoreInformation => (0x84, 0x08),
            Self::WakeUpIntervalCapabilitiesGet => (0x84, 0x09),
            Self::WakeUpIntervalCapabilitiesReport(_) => (0x84, 0x0A),

            Self::AssociationSet(_) => (0x85, 0x01),
            Self::AssociationGet { .. } => (0x85, 0x02),
            Self::AssociationReport(_) => (0x85, 0x03),
            Self::AssociationRemove(_) => (0x85, 0x04),

            Self::Raw(raw) => (raw.command_class.to_byte(), raw.command.to_byte()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_pair_decodes_to_raw() {
        let body = [0xFE, 0xFE, 0x01, 0x02, 0x03];
        let ZWaveCommand::Raw(raw) = ZWaveCommand::decode(&body).unwrap() else {
            panic!("expected raw command");
        };
        assert_eq!(raw.command_class, CommandClass::Unknown(0xFE));
        assert_eq!(raw.command, CommandId::Unknown(0xFE));
        assert_eq!(&raw.value[..], &[0x01, 0x02, 0x03]);
    }

    #[test]
    fn raw_round_trip() {
        let body = [0xFE, 0xFE, 0x01, 0x02, 0x03];
        let command = ZWaveCommand::decode(&body).unwrap();
        assert_eq!(command.to_bytes(), body);
    }

    #[test]
    fn known_class_unknown_command_keeps_symbols() {
        // Association groupings get has a registry entry but no decoder.
        let body = [0x85, 0x05];
        let ZWaveCommand::Raw(raw) = ZWaveCommand::decode(&body).unwrap() else {
            panic!("expected raw command");
        };
        assert_eq!(raw.command_class, CommandClass::Association);
        assert_eq!(raw.command, CommandId::AssociationGroupingsGet);
        assert!(raw.value.is_empty());
        assert_eq!(ZWaveCommand::Raw(raw).to_bytes(), body);
    }

    #[test]
    fn one_byte_body_is_too_short() {
        assert!(matches!(
            ZWaveCommand::decode(&[0x20]),
            Err(DecodeError::BodyTooShort { expected: 2, .. })
        ));
    }

    #[test]
    fn seq_no_stamping() {
        let mut command = ZWaveCommand::NodeListGet(proxy::NodeListGet { seq_no: 0 });
        command.set_seq_no(0x42);
        assert_eq!(command.seq_no(), Some(0x42));
        assert_eq!(command.to_bytes(), vec![0x52, 0x01, 0x42]);

        let mut plain = ZWaveCommand::BasicGet;
        plain.set_seq_no(0x42);
        assert_eq!(plain.seq_no(), None);
    }
}
