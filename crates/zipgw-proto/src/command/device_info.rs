//! Device identity: Manufacturer Specific (0x72), Version (0x86) and
//! Firmware Update Meta Data (0x7A).

use serde::{Deserialize, Serialize};

use crate::command::ZWaveCommand;
use crate::errors::{DecodeError, Result};
use crate::registry::CommandClass;
use crate::values::read_u16_be;

/// Manufacturer and product identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManufacturerSpecificReport {
    /// Z-Wave alliance manufacturer id
    pub manufacturer_id: u16,
    /// Product type id
    pub product_type_id: u16,
    /// Product id
    pub product_id: u16,
}

/// Which device id the device-specific report should carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum DeviceIdType {
    FactoryDefault,
    SerialNumber,
    PseudoRandom,
    Unknown(u8),
}

impl DeviceIdType {
    const fn from_byte(byte: u8) -> Self {
        match byte & 0b111 {
            0x00 => Self::FactoryDefault,
            0x01 => Self::SerialNumber,
            0x02 => Self::PseudoRandom,
            other => Self::Unknown(other),
        }
    }

    pub(crate) const fn to_byte(self) -> u8 {
        match self {
            Self::FactoryDefault => 0x00,
            Self::SerialNumber => 0x01,
            Self::PseudoRandom => 0x02,
            Self::Unknown(other) => other,
        }
    }
}

/// A device id, UTF-8 or raw binary depending on the wire format bits.
///
/// Binary ids are conventionally displayed as hex; the raw bytes are kept
/// so no information is lost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceId {
    /// Format 0: UTF-8 text
    Utf8(String),
    /// Format 1: raw binary
    Binary(Vec<u8>),
}

/// A device-specific id report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSpecificReport {
    /// Which id this is
    pub id_type: DeviceIdType,
    /// The id itself
    pub device_id: DeviceId,
}

/// Firmware metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirmwareMdReport {
    /// Z-Wave alliance manufacturer id
    pub manufacturer_id: u16,
    /// Firmware id
    pub firmware_id: u16,
    /// Firmware image checksum
    pub checksum: u16,
}

impl ManufacturerSpecificReport {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        dst.extend_from_slice(&self.manufacturer_id.to_be_bytes());
        dst.extend_from_slice(&self.product_type_id.to_be_bytes());
        dst.extend_from_slice(&self.product_id.to_be_bytes());
    }
}

impl DeviceSpecificReport {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        dst.push(self.id_type.to_byte());
        match &self.device_id {
            DeviceId::Utf8(text) => {
                dst.push(text.len() as u8 & 0x1F);
                dst.extend_from_slice(text.as_bytes());
            }
            DeviceId::Binary(bytes) => {
                dst.push(0b001 << 5 | bytes.len() as u8 & 0x1F);
                dst.extend_from_slice(bytes);
            }
        }
    }
}

impl FirmwareMdReport {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        dst.extend_from_slice(&self.manufacturer_id.to_be_bytes());
        dst.extend_from_slice(&self.firmware_id.to_be_bytes());
        dst.extend_from_slice(&self.checksum.to_be_bytes());
    }
}

pub(super) fn decode_manufacturer_report(rest: &[u8]) -> Result<ZWaveCommand> {
    if rest.len() < 6 {
        return Err(DecodeError::short("manufacturer specific report", 6, rest.len()));
    }
    Ok(ZWaveCommand::ManufacturerSpecificReport(ManufacturerSpecificReport {
        manufacturer_id: read_u16_be(&rest[0..], "manufacturer id")?,
        product_type_id: read_u16_be(&rest[2..], "product type id")?,
        product_id: read_u16_be(&rest[4..], "product id")?,
    }))
}

pub(super) fn decode_device_specific_get(rest: &[u8]) -> Result<ZWaveCommand> {
    let Some(&byte) = rest.first() else {
        return Err(DecodeError::short("device specific get", 1, 0));
    };
    Ok(ZWaveCommand::DeviceSpecificGet { id_type: DeviceIdType::from_byte(byte) })
}

pub(super) fn decode_device_specific_report(rest: &[u8]) -> Result<ZWaveCommand> {
    if rest.len() < 2 {
        return Err(DecodeError::short("device specific report", 2, rest.len()));
    }
    let id_type = DeviceIdType::from_byte(rest[0]);
    let format = rest[1] >> 5;
    let length = usize::from(rest[1] & 0x1F);
    let data = rest
        .get(2..2 + length)
        .ok_or(DecodeError::short("device specific id", length, rest.len() - 2))?;

    // A format-0 id that is not actually UTF-8 is kept as binary so no
    // bytes are invented or lost.
    let device_id = if format == 0 {
        match String::from_utf8(data.to_vec()) {
            Ok(text) => DeviceId::Utf8(text),
            Err(invalid) => DeviceId::Binary(invalid.into_bytes()),
        }
    } else {
        DeviceId::Binary(data.to_vec())
    };
    Ok(ZWaveCommand::DeviceSpecificReport(DeviceSpecificReport { id_type, device_id }))
}

pub(super) fn decode_version_cc_get(rest: &[u8]) -> Result<ZWaveCommand> {
    let Some(&class) = rest.first() else {
        return Err(DecodeError::short("version command class get", 1, 0));
    };
    Ok(ZWaveCommand::VersionCommandClassGet { class: CommandClass::from_byte(class) })
}

pub(super) fn decode_version_cc_report(rest: &[u8]) -> Result<ZWaveCommand> {
    let [class, version] = *rest else {
        return Err(DecodeError::short("version command class report", 2, rest.len()));
    };
    Ok(ZWaveCommand::VersionCommandClassReport {
        class: CommandClass::from_byte(class),
        version,
    })
}

pub(super) fn decode_firmware_md_report(rest: &[u8]) -> Result<ZWaveCommand> {
    // v3+ appends more firmware targets; the first three fields suffice here.
    if rest.len() < 6 {
        return Err(DecodeError::short("firmware md report", 6, rest.len()));
    }
    Ok(ZWaveCommand::FirmwareMdReport(FirmwareMdReport {
        manufacturer_id: read_u16_be(&rest[0..], "manufacturer id")?,
        firmware_id: read_u16_be(&rest[2..], "firmware id")?,
        checksum: read_u16_be(&rest[4..], "checksum")?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manufacturer_report_round_trip() {
        let report = ManufacturerSpecificReport {
            manufacturer_id: 0x0086,
            product_type_id: 0x0002,
            product_id: 0x0064,
        };
        let bytes = ZWaveCommand::ManufacturerSpecificReport(report).to_bytes();
        assert_eq!(bytes, vec![0x72, 0x05, 0x00, 0x86, 0x00, 0x02, 0x00, 0x64]);
        assert_eq!(
            ZWaveCommand::decode(&bytes).unwrap(),
            ZWaveCommand::ManufacturerSpecificReport(report)
        );
    }

    #[test]
    fn device_id_utf8() {
        let body = [0x72, 0x07, 0x01, 0x03, b'a', b'b', b'c'];
        let ZWaveCommand::DeviceSpecificReport(report) = ZWaveCommand::decode(&body).unwrap()
        else {
            panic!("expected device specific report");
        };
        assert_eq!(report.id_type, DeviceIdType::SerialNumber);
        assert_eq!(report.device_id, DeviceId::Utf8("abc".to_string()));
    }

    #[test]
    fn device_id_binary() {
        let body = [0x72, 0x07, 0x01, 0b001_00010, 0xDE, 0xAD];
        let ZWaveCommand::DeviceSpecificReport(report) = ZWaveCommand::decode(&body).unwrap()
        else {
            panic!("expected device specific report");
        };
        assert_eq!(report.device_id, DeviceId::Binary(vec![0xDE, 0xAD]));
    }

    #[test]
    fn version_report_for_unknown_class() {
        let body = [0x86, 0x14, 0xFE, 0x03];
        assert_eq!(
            ZWaveCommand::decode(&body).unwrap(),
            ZWaveCommand::VersionCommandClassReport {
                class: CommandClass::Unknown(0xFE),
                version: 3,
            }
        );
    }
}
