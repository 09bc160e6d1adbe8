//! Byte ↔ symbol tables for command classes, commands, device classes,
//! Security-2 keys and notification types.
//!
//! Every lookup in here is total: a byte the table does not know maps to an
//! `Unknown(byte)` variant instead of an error, so decoding arbitrary
//! gateway traffic can never fail at this layer. Adding a new command class
//! means adding a variant and two match arms here plus a body module under
//! [`crate::command`]; the dispatch core is untouched.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Z-Wave command class identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandClass {
    /// 0x20
    Basic,
    /// 0x23
    Zip,
    /// 0x25
    SwitchBinary,
    /// 0x26
    SwitchMultilevel,
    /// 0x31
    SensorMultilevel,
    /// 0x32
    Meter,
    /// 0x34
    NetworkManagementInclusion,
    /// 0x40
    ThermostatMode,
    /// 0x43
    ThermostatSetpoint,
    /// 0x44
    ThermostatFanMode,
    /// 0x45
    ThermostatFanState,
    /// 0x47
    ThermostatSetback,
    /// 0x4D
    NetworkManagementBasic,
    /// 0x52
    NetworkManagementProxy,
    /// 0x58
    ZipNd,
    /// 0x5E
    ZwaveplusInfo,
    /// 0x62
    DoorLock,
    /// 0x63
    UserCode,
    /// 0x69
    Mailbox,
    /// 0x70
    Configuration,
    /// 0x71
    Notification,
    /// 0x72
    ManufacturerSpecific,
    /// 0x7A
    FirmwareUpdateMd,
    /// 0x80
    Battery,
    /// 0x84
    WakeUp,
    /// 0x85
    Association,
    /// 0x86
    Version,
    /// 0x98
    Security,
    /// 0x9F
    Security2,
    /// Anything this table does not know
    Unknown(u8),
}

impl CommandClass {
    /// Map a raw byte to its command-class symbol (total).
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            0x20 => Self::Basic,
            0x23 => Self::Zip,
            0x25 => Self::SwitchBinary,
            0x26 => Self::SwitchMultilevel,
            0x31 => Self::SensorMultilevel,
            0x32 => Self::Meter,
            0x34 => Self::NetworkManagementInclusion,
            0x40 => Self::ThermostatMode,
            0x43 => Self::ThermostatSetpoint,
            0x44 => Self::ThermostatFanMode,
            0x45 => Self::ThermostatFanState,
            0x47 => Self::ThermostatSetback,
            0x4D => Self::NetworkManagementBasic,
            0x52 => Self::NetworkManagementProxy,
            0x58 => Self::ZipNd,
            0x5E => Self::ZwaveplusInfo,
            0x62 => Self::DoorLock,
            0x63 => Self::UserCode,
            0x69 => Self::Mailbox,
            0x70 => Self::Configuration,
            0x71 => Self::Notification,
            0x72 => Self::ManufacturerSpecific,
            0x7A => Self::FirmwareUpdateMd,
            0x80 => Self::Battery,
            0x84 => Self::WakeUp,
            0x85 => Self::Association,
            0x86 => Self::Version,
            0x98 => Self::Security,
            0x9F => Self::Security2,
            other => Self::Unknown(other),
        }
    }

    /// Map back to the raw byte.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::Basic => 0x20,
            Self::Zip => 0x23,
            Self::SwitchBinary => 0x25,
            Self::SwitchMultilevel => 0x26,
            Self::SensorMultilevel => 0x31,
            Self::Meter => 0x32,
            Self::NetworkManagementInclusion => 0x34,
            Self::ThermostatMode => 0x40,
            Self::ThermostatSetpoint => 0x43,
            Self::ThermostatFanMode => 0x44,
            Self::ThermostatFanState => 0x45,
            Self::ThermostatSetback => 0x47,
            Self::NetworkManagementBasic => 0x4D,
            Self::NetworkManagementProxy => 0x52,
            Self::ZipNd => 0x58,
            Self::ZwaveplusInfo => 0x5E,
            Self::DoorLock => 0x62,
            Self::UserCode => 0x63,
            Self::Mailbox => 0x69,
            Self::Configuration => 0x70,
            Self::Notification => 0x71,
            Self::ManufacturerSpecific => 0x72,
            Self::FirmwareUpdateMd => 0x7A,
            Self::Battery => 0x80,
            Self::WakeUp => 0x84,
            Self::Association => 0x85,
            Self::Version => 0x86,
            Self::Security => 0x98,
            Self::Security2 => 0x9F,
            Self::Unknown(other) => other,
        }
    }
}

/// Per-class command identifiers.
///
/// One flat namespace; the class prefix in the variant name disambiguates
/// commands that share a byte value across classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum CommandId {
    // Basic / switches (shared layout, distinct classes)
    BasicSet,
    BasicGet,
    BasicReport,
    SwitchBinarySet,
    SwitchBinaryGet,
    SwitchBinaryReport,
    SwitchMultilevelSet,
    SwitchMultilevelGet,
    SwitchMultilevelReport,

    // Multilevel sensor
    SensorMultilevelGet,
    SensorMultilevelReport,

    // Meter / battery
    MeterGet,
    MeterReport,
    BatteryGet,
    BatteryReport,

    // Network management inclusion
    NodeAdd,
    NodeAddStatus,
    NodeRemove,
    NodeRemoveStatus,
    NodeNeighborUpdateRequest,
    NodeNeighborUpdateStatus,
    NodeAddKeysReport,
    NodeAddKeysSet,
    NodeAddDskReport,
    NodeAddDskSet,

    // Network management basic
    LearnModeSet,
    LearnModeSetStatus,
    DefaultSet,
    DefaultSetComplete,

    // Network management proxy
    NodeListGet,
    NodeListReport,
    NodeInfoCachedGet,
    NodeInfoCacheReport,

    // Thermostat family
    ThermostatModeSet,
    ThermostatModeGet,
    ThermostatModeReport,
    ThermostatSetpointSet,
    ThermostatSetpointGet,
    ThermostatSetpointReport,
    ThermostatFanModeSet,
    ThermostatFanModeGet,
    ThermostatFanModeReport,
    ThermostatFanStateGet,
    ThermostatFanStateReport,
    ThermostatSetbackSet,
    ThermostatSetbackGet,
    ThermostatSetbackReport,

    // Door lock / user code
    DoorLockOperationSet,
    DoorLockOperationGet,
    DoorLockOperationReport,
    UserCodeSet,
    UserCodeGet,
    UserCodeReport,
    UsersNumberGet,
    UsersNumberReport,

    // Configuration
    ConfigurationSet,
    ConfigurationGet,
    ConfigurationReport,
    ConfigurationBulkGet,
    ConfigurationBulkReport,

    // Notification
    NotificationReport,

    // Device identity
    ManufacturerSpecificGet,
    ManufacturerSpecificReport,
    DeviceSpecificGet,
    DeviceSpecificReport,
    VersionCommandClassGet,
    VersionCommandClassReport,
    FirmwareMdGet,
    FirmwareMdReport,

    // Mailbox
    MailboxConfigurationGet,
    MailboxConfigurationReport,

    // Wake up
    WakeUpIntervalSet,
    WakeUpIntervalGet,
    WakeUpIntervalReport,
    WakeUpNoMoreInformation,
    WakeUpIntervalCapabilitiesGet,
    WakeUpIntervalCapabilitiesReport,

    // Association
    AssociationSet,
    AssociationGet,
    AssociationReport,
    AssociationRemove,
    AssociationGroupingsGet,
    AssociationGroupingsReport,

    /// Anything this table does not know for the given class
    Unknown(u8),
}

impl CommandId {
    /// Map a `(command class, command byte)` pair to its symbol (total).
    #[must_use]
    pub fn from_bytes(class: CommandClass, byte: u8) -> Self {
        use CommandClass as Cc;
        match (class, byte) {
            (Cc::Basic, 0x01) => Self::BasicSet,
            (Cc::Basic, 0x02) => Self::BasicGet,
            (Cc::Basic, 0x03) => Self::BasicReport,

            (Cc::SwitchBinary, 0x01) => Self::SwitchBinarySet,
            (Cc::SwitchBinary, 0x02) => Self::SwitchBinaryGet,
            (Cc::SwitchBinary, 0x03) => Self::SwitchBinaryReport,

            (Cc::SwitchMultilevel, 0x01) => Self::SwitchMultilevelSet,
            (Cc::SwitchMultilevel, 0x02) => Self::SwitchMultilevelGet,
            (Cc::SwitchMultilevel, 0x03) => Self::SwitchMultilevelReport,

            (Cc::SensorMultilevel, 0x04) => Self::SensorMultilevelGet,
            (Cc::SensorMultilevel, 0x05) => Self::SensorMultilevelReport,

            (Cc::Meter, 0x01) => Self::MeterGet,
            (Cc::Meter, 0x02) => Self::MeterReport,
            (Cc::Battery, 0x02) => Self::BatteryGet,
            (Cc::Battery, 0x03) => Self::BatteryReport,

            (Cc::NetworkManagementInclusion, 0x01) => Self::NodeAdd,
            (Cc::NetworkManagementInclusion, 0x02) => Self::NodeAddStatus,
            (Cc::NetworkManagementInclusion, 0x03) => Self::NodeRemove,
            (Cc::NetworkManagementInclusion, 0x04) => Self::NodeRemoveStatus,
            (Cc::NetworkManagementInclusion, 0x0B) => Self::NodeNeighborUpdateRequest,
            (Cc::NetworkManagementInclusion, 0x0C) => Self::NodeNeighborUpdateStatus,
            (Cc::NetworkManagementInclusion, 0x11) => Self::NodeAddKeysReport,
            (Cc::NetworkManagementInclusion, 0x12) => Self::NodeAddKeysSet,
            (Cc::NetworkManagementInclusion, 0x13) => Self::NodeAddDskReport,
            (Cc::NetworkManagementInclusion, 0x14) => Self::NodeAddDskSet,

            (Cc::NetworkManagementBasic, 0x01) => Self::LearnModeSet,
            (Cc::NetworkManagementBasic, 0x02) => Self::LearnModeSetStatus,
            (Cc::NetworkManagementBasic, 0x06) => Self::DefaultSet,
            (Cc::NetworkManagementBasic, 0x07) => Self::DefaultSetComplete,

            (Cc::NetworkManagementProxy, 0x01) => Self::NodeListGet,
            (Cc::NetworkManagementProxy, 0x02) => Self::NodeListReport,
            (Cc::NetworkManagementProxy, 0x03) => Self::NodeInfoCachedGet,
            (Cc::NetworkManagementProxy, 0x04) => Self::NodeInfoCacheReport,

            (Cc::ThermostatMode, 0x01) => Self::ThermostatModeSet,
            (Cc::ThermostatMode, 0x02) => Self::ThermostatModeGet,
            (Cc::ThermostatMode, 0x03) => Self::ThermostatModeReport,

            (Cc::ThermostatSetpoint, 0x01) => Self::ThermostatSetpointSet,
            (Cc::ThermostatSetpoint, 0x02) => Self::ThermostatSetpointGet,
            (Cc::ThermostatSetpoint, 0x03) => Self::ThermostatSetpointReport,

            (Cc::ThermostatFanMode, 0x01) => Self::ThermostatFanModeSet,
            (Cc::ThermostatFanMode, 0x02) => Self::ThermostatFanModeGet,
            (Cc::ThermostatFanMode, 0x03) => Self::ThermostatFanModeReport,

            (Cc::ThermostatFanState, 0x02) => Self::ThermostatFanStateGet,
            (Cc::ThermostatFanState, 0x03) => Self::ThermostatFanStateReport,

            (Cc::ThermostatSetback, 0x01) => Self::ThermostatSetbackSet,
            (Cc::ThermostatSetback, 0x02) => Self::ThermostatSetbackGet,
            (Cc::ThermostatSetback, 0x03) => Self::ThermostatSetbackReport,

            (Cc::DoorLock, 0x01) => Self::DoorLockOperationSet,
            (Cc::DoorLock, 0x02) => Self::DoorLockOperationGet,
            (Cc::DoorLock, 0x03) => Self::DoorLockOperationReport,

            (Cc::UserCode, 0x01) => Self::UserCodeSet,
            (Cc::UserCode, 0x02) => Self::UserCodeGet,
            (Cc::UserCode, 0x03) => Self::UserCodeReport,
            (Cc::UserCode, 0x04) => Self::UsersNumberGet,
            (Cc::UserCode, 0x05) => Self::UsersNumberReport,

            (Cc::Configuration, 0x04) => Self::ConfigurationSet,
            (Cc::Configuration, 0x05) => Self::ConfigurationGet,
            (Cc::Configuration, 0x06) => Self::ConfigurationReport,
            (Cc::Configuration, 0x07) => Self::ConfigurationBulkGet,
            (Cc::Configuration, 0x09) => Self::ConfigurationBulkReport,

            (Cc::Notification, 0x05) => Self::NotificationReport,

            (Cc::ManufacturerSpecific, 0x04) => Self::ManufacturerSpecificGet,
            (Cc::ManufacturerSpecific, 0x05) => Self::ManufacturerSpecificReport,
            (Cc::ManufacturerSpecific, 0x06) => Self::DeviceSpecificGet,
            (Cc::ManufacturerSpecific, 0x07) => Self::DeviceSpecificReport,

            (Cc::Version, 0x13) => Self::VersionCommandClassGet,
            (Cc::Version, 0x14) => Self::VersionCommandClassReport,

            (Cc::FirmwareUpdateMd, 0x01) => Self::FirmwareMdGet,
            (Cc::FirmwareUpdateMd, 0x02) => Self::FirmwareMdReport,

            (Cc::Mailbox, 0x01) => Self::MailboxConfigurationGet,
            (Cc::Mailbox, 0x03) => Self::MailboxConfigurationReport,

            (Cc::WakeUp, 0x04) => Self::WakeUpIntervalSet,
            (Cc::WakeUp, 0x05) => Self::WakeUpIntervalGet,
            (Cc::WakeUp, 0x06) => Self::WakeUpIntervalReport,
            (Cc::WakeUp, 0x08) => Self::WakeUpNoMoreInformation,
            (Cc::WakeUp, 0x09) => Self::WakeUpIntervalCapabilitiesGet,
            (Cc::WakeUp, 0x0A) => Self::WakeUpIntervalCapabilitiesReport,

            (Cc::Association, 0x01) => Self::AssociationSet,
            (Cc::Association, 0x02) => Self::AssociationGet,
            (Cc::Association, 0x03) => Self::AssociationReport,
            (Cc::Association, 0x04) => Self::AssociationRemove,
            (Cc::Association, 0x05) => Self::AssociationGroupingsGet,
            (Cc::Association, 0x06) => Self::AssociationGroupingsReport,

            (_, other) => Self::Unknown(other),
        }
    }

    /// Map back to the raw command byte.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::BasicSet
            | Self::SwitchBinarySet
            | Self::SwitchMultilevelSet
            | Self::NodeAdd
            | Self::LearnModeSet
            | Self::NodeListGet
            | Self::ThermostatModeSet
            | Self::ThermostatSetpointSet
            | Self::ThermostatFanModeSet
            | Self::ThermostatSetbackSet
            | Self::DoorLockOperationSet
            | Self::UserCodeSet
            | Self::MeterGet
            | Self::FirmwareMdGet
            | Self::MailboxConfigurationGet
            | Self::AssociationSet => 0x01,
            Self::BasicGet
            | Self::SwitchBinaryGet
            | Self::SwitchMultilevelGet
            | Self::NodeAddStatus
            | Self::LearnModeSetStatus
            | Self::NodeListReport
            | Self::ThermostatModeGet
            | Self::ThermostatSetpointGet
            | Self::ThermostatFanModeGet
            | Self::ThermostatFanStateGet
            | Self::ThermostatSetbackGet
            | Self::DoorLockOperationGet
            | Self::UserCodeGet
            | Self::MeterReport
            | Self::FirmwareMdReport
            | Self::BatteryGet
            | Self::AssociationGet => 0x02,
            Self::BasicReport
            | Self::SwitchBinaryReport
            | Self::SwitchMultilevelReport
            | Self::NodeRemove
            | Self::NodeInfoCachedGet
            | Self::ThermostatModeReport
            | Self::ThermostatSetpointReport
            | Self::ThermostatFanModeReport
            | Self::ThermostatFanStateReport
            | Self::ThermostatSetbackReport
            | Self::DoorLockOperationReport
            | Self::UserCodeReport
            | Self::BatteryReport
            | Self::MailboxConfigurationReport
            | Self::AssociationReport => 0x03,
            Self::SensorMultilevelGet
            | Self::NodeRemoveStatus
            | Self::NodeInfoCacheReport
            | Self::UsersNumberGet
            | Self::ConfigurationSet
            | Self::ManufacturerSpecificGet
            | Self::WakeUpIntervalSet
            | Self::AssociationRemove => 0x04,
            Self::SensorMultilevelReport
            | Self::UsersNumberReport
            | Self::ConfigurationGet
            | Self::NotificationReport
            | Self::ManufacturerSpecificReport
            | Self::WakeUpIntervalGet
            | Self::AssociationGroupingsGet => 0x05,
            Self::DefaultSet
            | Self::ConfigurationReport
            | Self::DeviceSpecificGet
            | Self::WakeUpIntervalReport
            | Self::AssociationGroupingsReport => 0x06,
            Self::DefaultSetComplete | Self::ConfigurationBulkGet | Self::DeviceSpecificReport => {
                0x07
            }
            Self::WakeUpNoMoreInformation => 0x08,
            Self::ConfigurationBulkReport | Self::WakeUpIntervalCapabilitiesGet => 0x09,
            Self::WakeUpIntervalCapabilitiesReport => 0x0A,
            Self::NodeNeighborUpdateRequest => 0x0B,
            Self::NodeNeighborUpdateStatus => 0x0C,
            Self::NodeAddKeysReport => 0x11,
            Self::NodeAddKeysSet => 0x12,
            Self::NodeAddDskReport => 0x13,
            Self::NodeAddDskSet => 0x14,
            Self::VersionCommandClassGet => 0x13,
            Self::VersionCommandClassReport => 0x14,
            Self::Unknown(other) => other,
        }
    }
}

/// Basic device classes from a node information frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum BasicDeviceClass {
    Controller,
    StaticController,
    Slave,
    RoutingSlave,
    Unknown(u8),
}

impl BasicDeviceClass {
    /// Map a raw byte to the basic device class (total).
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            0x01 => Self::Controller,
            0x02 => Self::StaticController,
            0x03 => Self::Slave,
            0x04 => Self::RoutingSlave,
            other => Self::Unknown(other),
        }
    }

    /// Map back to the raw byte.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::Controller => 0x01,
            Self::StaticController => 0x02,
            Self::Slave => 0x03,
            Self::RoutingSlave => 0x04,
            Self::Unknown(other) => other,
        }
    }
}

/// Generic device classes from a node information frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum GenericDeviceClass {
    GenericController,
    StaticController,
    AvControlPoint,
    Display,
    NetworkExtender,
    Appliance,
    SensorNotification,
    Thermostat,
    WindowCovering,
    RepeaterSlave,
    SwitchBinary,
    SwitchMultilevel,
    SwitchRemote,
    SwitchToggle,
    ZipNode,
    Ventilation,
    SecurityPanel,
    WallController,
    SensorBinary,
    SensorMultilevel,
    MeterPulse,
    Meter,
    EntryControl,
    SemiInteroperable,
    SensorAlarm,
    NonInteroperable,
    Unknown(u8),
}

impl GenericDeviceClass {
    /// Map a raw byte to the generic device class (total).
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            0x01 => Self::GenericController,
            0x02 => Self::StaticController,
            0x03 => Self::AvControlPoint,
            0x04 => Self::Display,
            0x05 => Self::NetworkExtender,
            0x06 => Self::Appliance,
            0x07 => Self::SensorNotification,
            0x08 => Self::Thermostat,
            0x09 => Self::WindowCovering,
            0x0F => Self::RepeaterSlave,
            0x10 => Self::SwitchBinary,
            0x11 => Self::SwitchMultilevel,
            0x12 => Self::SwitchRemote,
            0x13 => Self::SwitchToggle,
            0x15 => Self::ZipNode,
            0x16 => Self::Ventilation,
            0x17 => Self::SecurityPanel,
            0x18 => Self::WallController,
            0x20 => Self::SensorBinary,
            0x21 => Self::SensorMultilevel,
            0x30 => Self::MeterPulse,
            0x31 => Self::Meter,
            0x40 => Self::EntryControl,
            0x50 => Self::SemiInteroperable,
            0xA1 => Self::SensorAlarm,
            0xFF => Self::NonInteroperable,
            other => Self::Unknown(other),
        }
    }

    /// Map back to the raw byte.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::GenericController => 0x01,
            Self::StaticController => 0x02,
            Self::AvControlPoint => 0x03,
            Self::Display => 0x04,
            Self::NetworkExtender => 0x05,
            Self::Appliance => 0x06,
            Self::SensorNotification => 0x07,
            Self::Thermostat => 0x08,
            Self::WindowCovering => 0x09,
            Self::RepeaterSlave => 0x0F,
            Self::SwitchBinary => 0x10,
            Self::SwitchMultilevel => 0x11,
            Self::SwitchRemote => 0x12,
            Self::SwitchToggle => 0x13,
            Self::ZipNode => 0x15,
            Self::Ventilation => 0x16,
            Self::SecurityPanel => 0x17,
            Self::WallController => 0x18,
            Self::SensorBinary => 0x20,
            Self::SensorMultilevel => 0x21,
            Self::MeterPulse => 0x30,
            Self::Meter => 0x31,
            Self::EntryControl => 0x40,
            Self::SemiInteroperable => 0x50,
            Self::SensorAlarm => 0xA1,
            Self::NonInteroperable => 0xFF,
            Self::Unknown(other) => other,
        }
    }
}

/// Specific device classes, scoped by the generic class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum SpecificDeviceClass {
    NotUsed,
    PortableRemoteController,
    PcController,
    PowerSwitchBinary,
    SirenSwitchBinary,
    ValveOpenClose,
    PowerSwitchMultilevel,
    MotorMultiposition,
    ThermostatGeneral,
    ThermostatGeneralV2,
    SetbackThermostat,
    RoutingSensorMultilevel,
    SimpleMeter,
    DoorLockKeypad,
    SecureKeypadDoorLock,
    Unknown(u8),
}

impl SpecificDeviceClass {
    /// Map a `(generic, byte)` pair to the specific device class (total).
    #[must_use]
    pub const fn from_bytes(generic: GenericDeviceClass, byte: u8) -> Self {
        use GenericDeviceClass as G;
        match (generic, byte) {
            (_, 0x00) => Self::NotUsed,
            (G::GenericController, 0x01) => Self::PortableRemoteController,
            (G::StaticController, 0x01) => Self::PcController,
            (G::SwitchBinary, 0x01) => Self::PowerSwitchBinary,
            (G::SwitchBinary, 0x05) => Self::SirenSwitchBinary,
            (G::SwitchBinary, 0x06) => Self::ValveOpenClose,
            (G::SwitchMultilevel, 0x01) => Self::PowerSwitchMultilevel,
            (G::SwitchMultilevel, 0x03) => Self::MotorMultiposition,
            (G::Thermostat, 0x02) => Self::ThermostatGeneral,
            (G::Thermostat, 0x06) => Self::ThermostatGeneralV2,
            (G::Thermostat, 0x01) => Self::SetbackThermostat,
            (G::SensorMultilevel, 0x01) => Self::RoutingSensorMultilevel,
            (G::Meter, 0x01) => Self::SimpleMeter,
            (G::EntryControl, 0x01) => Self::DoorLockKeypad,
            (G::EntryControl, 0x03) => Self::SecureKeypadDoorLock,
            (_, other) => Self::Unknown(other),
        }
    }

    /// Map back to the raw byte.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::NotUsed => 0x00,
            Self::PortableRemoteController => 0x01,
            Self::PcController => 0x01,
            Self::PowerSwitchBinary => 0x01,
            Self::SirenSwitchBinary => 0x05,
            Self::ValveOpenClose => 0x06,
            Self::PowerSwitchMultilevel => 0x01,
            Self::MotorMultiposition => 0x03,
            Self::ThermostatGeneral => 0x02,
            Self::ThermostatGeneralV2 => 0x06,
            Self::SetbackThermostat => 0x01,
            Self::RoutingSensorMultilevel => 0x01,
            Self::SimpleMeter => 0x01,
            Self::DoorLockKeypad => 0x01,
            Self::SecureKeypadDoorLock => 0x03,
            Self::Unknown(other) => other,
        }
    }
}

bitflags! {
    /// Security-2 key bitmask as carried in key-exchange frames.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct S2KeyMask: u8 {
        /// S2 unauthenticated key
        const UNAUTHENTICATED = 0x01;

        /// S2 authenticated key
        const AUTHENTICATED = 0x02;

        /// S2 access-control key
        const ACCESS_CONTROL = 0x04;

        /// Legacy S0 network key
        const S0 = 0x80;
    }
}

/// Individual Security-2 (and legacy S0) keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Security2Key {
    /// Legacy S0 network key
    S0,
    /// S2 unauthenticated key
    S2Unauthenticated,
    /// S2 authenticated key
    S2Authenticated,
    /// S2 access-control key
    S2AccessControl,
}

impl Security2Key {
    /// Expand a key bitmask into the set of granted keys, weakest first.
    #[must_use]
    pub fn from_mask(mask: S2KeyMask) -> Vec<Self> {
        let mut keys = Vec::new();
        if mask.contains(S2KeyMask::S0) {
            keys.push(Self::S0);
        }
        if mask.contains(S2KeyMask::UNAUTHENTICATED) {
            keys.push(Self::S2Unauthenticated);
        }
        if mask.contains(S2KeyMask::AUTHENTICATED) {
            keys.push(Self::S2Authenticated);
        }
        if mask.contains(S2KeyMask::ACCESS_CONTROL) {
            keys.push(Self::S2AccessControl);
        }
        keys
    }

    /// Collapse a set of keys back into the wire bitmask.
    #[must_use]
    pub fn to_mask(keys: &[Self]) -> S2KeyMask {
        let mut mask = S2KeyMask::empty();
        for key in keys {
            mask |= match key {
                Self::S0 => S2KeyMask::S0,
                Self::S2Unauthenticated => S2KeyMask::UNAUTHENTICATED,
                Self::S2Authenticated => S2KeyMask::AUTHENTICATED,
                Self::S2AccessControl => S2KeyMask::ACCESS_CONTROL,
            };
        }
        mask
    }

    /// The strongest key in a mask, if any.
    ///
    /// Ordering is `S0 < S2Unauthenticated < S2Authenticated <
    /// S2AccessControl`, matching the grant levels used during inclusion.
    #[must_use]
    pub fn highest(mask: S2KeyMask) -> Option<Self> {
        Self::from_mask(mask).into_iter().max()
    }
}

/// Security-2 key-exchange failure codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum KexFailType {
    None,
    KexKey,
    KexScheme,
    KexCurves,
    Decrypt,
    Cancel,
    Auth,
    KeyGet,
    KeyVerify,
    KeyReport,
    Unknown(u8),
}

impl KexFailType {
    /// Map a raw byte to the failure symbol (total).
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            0x00 => Self::None,
            0x01 => Self::KexKey,
            0x02 => Self::KexScheme,
            0x03 => Self::KexCurves,
            0x05 => Self::Decrypt,
            0x06 => Self::Cancel,
            0x07 => Self::Auth,
            0x08 => Self::KeyGet,
            0x09 => Self::KeyVerify,
            0x0A => Self::KeyReport,
            other => Self::Unknown(other),
        }
    }

    /// Map back to the raw byte.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::None => 0x00,
            Self::KexKey => 0x01,
            Self::KexScheme => 0x02,
            Self::KexCurves => 0x03,
            Self::Decrypt => 0x05,
            Self::Cancel => 0x06,
            Self::Auth => 0x07,
            Self::KeyGet => 0x08,
            Self::KeyVerify => 0x09,
            Self::KeyReport => 0x0A,
            Self::Unknown(other) => other,
        }
    }
}

/// Notification types from the Notification command class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum NotificationType {
    SmokeAlarm,
    CoAlarm,
    Co2Alarm,
    HeatAlarm,
    WaterAlarm,
    AccessControl,
    HomeSecurity,
    PowerManagement,
    System,
    EmergencyAlarm,
    Clock,
    Unknown(u8),
}

impl NotificationType {
    /// Map a raw byte to the notification type (total).
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            0x01 => Self::SmokeAlarm,
            0x02 => Self::CoAlarm,
            0x03 => Self::Co2Alarm,
            0x04 => Self::HeatAlarm,
            0x05 => Self::WaterAlarm,
            0x06 => Self::AccessControl,
            0x07 => Self::HomeSecurity,
            0x08 => Self::PowerManagement,
            0x09 => Self::System,
            0x0A => Self::EmergencyAlarm,
            0x0B => Self::Clock,
            other => Self::Unknown(other),
        }
    }

    /// Map back to the raw byte.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::SmokeAlarm => 0x01,
            Self::CoAlarm => 0x02,
            Self::Co2Alarm => 0x03,
            Self::HeatAlarm => 0x04,
            Self::WaterAlarm => 0x05,
            Self::AccessControl => 0x06,
            Self::HomeSecurity => 0x07,
            Self::PowerManagement => 0x08,
            Self::System => 0x09,
            Self::EmergencyAlarm => 0x0A,
            Self::Clock => 0x0B,
            Self::Unknown(other) => other,
        }
    }
}

/// Notification states, scoped by the notification type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum NotificationState {
    Idle,
    // Access control
    ManualLock,
    ManualUnlock,
    RfLock,
    RfUnlock,
    KeypadLock,
    KeypadUnlock,
    DoorOpen,
    DoorClosed,
    // Home security
    Intrusion,
    IntrusionUnknownLocation,
    TamperingCoverRemoved,
    GlassBreakage,
    MotionDetection,
    MotionDetectionUnknownLocation,
    // Power management
    PowerApplied,
    AcDisconnected,
    AcReconnected,
    ReplaceBatterySoon,
    ReplaceBatteryNow,
    // Smoke / water
    Detected,
    DetectedUnknownLocation,
    Unknown(u8),
}

impl NotificationState {
    /// Map a `(notification type, event byte)` pair to a state (total).
    #[must_use]
    pub const fn from_bytes(kind: NotificationType, byte: u8) -> Self {
        use NotificationType as T;
        match (kind, byte) {
            (_, 0x00) => Self::Idle,

            (T::AccessControl, 0x01) => Self::ManualLock,
            (T::AccessControl, 0x02) => Self::ManualUnlock,
            (T::AccessControl, 0x03) => Self::RfLock,
            (T::AccessControl, 0x04) => Self::RfUnlock,
            (T::AccessControl, 0x05) => Self::KeypadLock,
            (T::AccessControl, 0x06) => Self::KeypadUnlock,
            (T::AccessControl, 0x16) => Self::DoorOpen,
            (T::AccessControl, 0x17) => Self::DoorClosed,

            (T::HomeSecurity, 0x01) => Self::Intrusion,
            (T::HomeSecurity, 0x02) => Self::IntrusionUnknownLocation,
            (T::HomeSecurity, 0x03) => Self::TamperingCoverRemoved,
            (T::HomeSecurity, 0x06) => Self::GlassBreakage,
            (T::HomeSecurity, 0x07) => Self::MotionDetection,
            (T::HomeSecurity, 0x08) => Self::MotionDetectionUnknownLocation,

            (T::PowerManagement, 0x01) => Self::PowerApplied,
            (T::PowerManagement, 0x02) => Self::AcDisconnected,
            (T::PowerManagement, 0x03) => Self::AcReconnected,
            (T::PowerManagement, 0x0A) => Self::ReplaceBatterySoon,
            (T::PowerManagement, 0x0B) => Self::ReplaceBatteryNow,

            (T::SmokeAlarm | T::CoAlarm | T::Co2Alarm | T::HeatAlarm | T::WaterAlarm, 0x01) => {
                Self::DetectedUnknownLocation
            }
            (T::SmokeAlarm | T::CoAlarm | T::Co2Alarm | T::HeatAlarm | T::WaterAlarm, 0x02) => {
                Self::Detected
            }

            (_, other) => Self::Unknown(other),
        }
    }

    /// Map back to the raw event byte.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::Idle => 0x00,
            Self::ManualLock => 0x01,
            Self::ManualUnlock => 0x02,
            Self::RfLock => 0x03,
            Self::RfUnlock => 0x04,
            Self::KeypadLock => 0x05,
            Self::KeypadUnlock => 0x06,
            Self::DoorOpen => 0x16,
            Self::DoorClosed => 0x17,
            Self::Intrusion => 0x01,
            Self::IntrusionUnknownLocation => 0x02,
            Self::TamperingCoverRemoved => 0x03,
            Self::GlassBreakage => 0x06,
            Self::MotionDetection => 0x07,
            Self::MotionDetectionUnknownLocation => 0x08,
            Self::PowerApplied => 0x01,
            Self::AcDisconnected => 0x02,
            Self::AcReconnected => 0x03,
            Self::ReplaceBatterySoon => 0x0A,
            Self::ReplaceBatteryNow => 0x0B,
            Self::DetectedUnknownLocation => 0x01,
            Self::Detected => 0x02,
            Self::Unknown(other) => other,
        }
    }
}

/// Marker separating supported from controlled classes in a class list
const CC_LIST_MARK: u8 = 0xEF;

/// Escape prefix for extended (two-byte) command classes
const CC_LIST_EXTENDED: u8 = 0xF1;

/// Parse a command-class list from a node information frame.
///
/// The bytes `0x00` (padding), `0xEF` (support/control marker) and `0xF1`
/// (extended-class escape) are skipped, not emitted. Input order is
/// preserved for the remaining bytes.
#[must_use]
pub fn parse_command_class_list(bytes: &[u8]) -> Vec<CommandClass> {
    bytes
        .iter()
        .filter(|&&b| b != 0x00 && b != CC_LIST_MARK && b != CC_LIST_EXTENDED)
        .map(|&b| CommandClass::from_byte(b))
        .collect()
}

/// Encode a command-class list back to bytes.
#[must_use]
pub fn encode_command_class_list(classes: &[CommandClass]) -> Vec<u8> {
    classes.iter().map(|c| c.to_byte()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_class_round_trip() {
        for byte in 0..=u8::MAX {
            assert_eq!(CommandClass::from_byte(byte).to_byte(), byte);
        }
    }

    #[test]
    fn unknown_command_class_is_tagged() {
        assert_eq!(CommandClass::from_byte(0xFE), CommandClass::Unknown(0xFE));
    }

    #[test]
    fn command_id_lookup() {
        assert_eq!(
            CommandId::from_bytes(CommandClass::NetworkManagementProxy, 0x02),
            CommandId::NodeListReport
        );
        assert_eq!(
            CommandId::from_bytes(CommandClass::Unknown(0xFE), 0xFE),
            CommandId::Unknown(0xFE)
        );
    }

    #[test]
    fn association_report_and_groupings_both_mapped() {
        assert_eq!(
            CommandId::from_bytes(CommandClass::Association, 0x03),
            CommandId::AssociationReport
        );
        assert_eq!(
            CommandId::from_bytes(CommandClass::Association, 0x06),
            CommandId::AssociationGroupingsReport
        );
    }

    #[test]
    fn key_mask_round_trip() {
        let keys = Security2Key::from_mask(S2KeyMask::UNAUTHENTICATED | S2KeyMask::ACCESS_CONTROL);
        assert_eq!(keys, vec![Security2Key::S2Unauthenticated, Security2Key::S2AccessControl]);
        assert_eq!(
            Security2Key::to_mask(&keys),
            S2KeyMask::UNAUTHENTICATED | S2KeyMask::ACCESS_CONTROL
        );
    }

    #[test]
    fn highest_key() {
        assert_eq!(
            Security2Key::highest(S2KeyMask::S0 | S2KeyMask::AUTHENTICATED),
            Some(Security2Key::S2Authenticated)
        );
        assert_eq!(Security2Key::highest(S2KeyMask::empty()), None);
    }

    #[test]
    fn class_list_skips_markers() {
        let bytes = [0x25, 0x00, 0xEF, 0x26, 0xF1, 0x70];
        assert_eq!(
            parse_command_class_list(&bytes),
            vec![
                CommandClass::SwitchBinary,
                CommandClass::SwitchMultilevel,
                CommandClass::Configuration,
            ]
        );
    }

    #[test]
    fn notification_state_lookup() {
        assert_eq!(
            NotificationState::from_bytes(NotificationType::AccessControl, 0x16),
            NotificationState::DoorOpen
        );
        assert_eq!(
            NotificationState::from_bytes(NotificationType::Clock, 0x42),
            NotificationState::Unknown(0x42)
        );
    }
}
