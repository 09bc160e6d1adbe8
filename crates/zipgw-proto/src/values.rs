//! Scaled integer values shared by sensor-style reports.
//!
//! Several command classes (multilevel sensor, thermostat setpoint, meter)
//! encode a reading as a `precision(3) scale(2) size(3)` metadata byte
//! followed by a signed big-endian integer of `size` bytes. The reported
//! reading is `value * 10^(-precision)`; `scale` names the unit and is
//! reported separately. Sub-byte fields are MSB-first in declaration order.

use serde::{Deserialize, Serialize};

use crate::errors::{DecodeError, Result};

/// A signed reading with its precision/scale/size metadata.
///
/// Both the raw integer and the metadata are kept so callers that need the
/// exact reading are not limited to the rounded [`ScaledValue::level`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaledValue {
    /// Decimal places: the reading is `value * 10^(-precision)`
    pub precision: u8,
    /// Unit selector, meaning depends on the command class
    pub scale: u8,
    /// Width of the wire integer in bytes (1, 2 or 4)
    pub size: u8,
    /// Raw signed integer as carried on the wire
    pub value: i64,
}

impl ScaledValue {
    /// The reading rounded to an integer (half away from zero).
    #[must_use]
    pub fn level(&self) -> i64 {
        let divisor = 10i64.pow(u32::from(self.precision));
        round_div(self.value, divisor)
    }

    /// Decode a metadata byte plus value bytes.
    ///
    /// Returns the value and the number of bytes consumed (metadata byte
    /// included) so callers with trailing fields can keep slicing.
    ///
    /// # Errors
    ///
    /// Fails if the declared size is not 1, 2 or 4, or if the buffer ends
    /// before `size` value bytes.
    pub fn decode(bytes: &[u8]) -> Result<(Self, usize)> {
        let Some(&meta) = bytes.first() else {
            return Err(DecodeError::short("scaled value", 2, bytes.len()));
        };
        let precision = meta >> 5;
        let scale = (meta >> 3) & 0b11;
        let size = meta & 0b111;

        let value = read_signed_be(&bytes[1..], size)?;
        Ok((Self { precision, scale, size, value }, 1 + usize::from(size)))
    }

    /// Encode the metadata byte plus value bytes.
    ///
    /// The value is truncated to the declared size; range validation happens
    /// where the value is constructed.
    pub fn encode(&self, dst: &mut Vec<u8>) {
        dst.push(meta_byte(self.precision, self.scale, self.size));
        write_signed_be(self.value, self.size, dst);
    }
}

/// Pack a `precision(3) scale(2) size(3)` metadata byte.
#[must_use]
pub(crate) fn meta_byte(precision: u8, scale: u8, size: u8) -> u8 {
    (precision & 0b111) << 5 | (scale & 0b11) << 3 | (size & 0b111)
}

/// Read a signed big-endian integer of `size` bytes (1, 2 or 4).
pub(crate) fn read_signed_be(bytes: &[u8], size: u8) -> Result<i64> {
    let width = usize::from(size);
    let Some(raw) = bytes.get(..width) else {
        return Err(DecodeError::short("signed integer", width, bytes.len()));
    };
    match size {
        1 => Ok(i64::from(raw[0] as i8)),
        2 => Ok(i64::from(i16::from_be_bytes([raw[0], raw[1]]))),
        4 => Ok(i64::from(i32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]))),
        other => Err(DecodeError::InvalidValueSize(other)),
    }
}

/// Write a signed big-endian integer of `size` bytes (1, 2 or 4).
///
/// Sizes outside the valid set write nothing; callers validate first.
pub(crate) fn write_signed_be(value: i64, size: u8, dst: &mut Vec<u8>) {
    match size {
        1 => dst.push(value as u8),
        2 => dst.extend_from_slice(&(value as i16).to_be_bytes()),
        4 => dst.extend_from_slice(&(value as i32).to_be_bytes()),
        _ => {}
    }
}

/// Read a 24-bit unsigned big-endian integer.
pub(crate) fn read_u24_be(bytes: &[u8], context: &'static str) -> Result<u32> {
    let Some(raw) = bytes.get(..3) else {
        return Err(DecodeError::short(context, 3, bytes.len()));
    };
    Ok(u32::from(raw[0]) << 16 | u32::from(raw[1]) << 8 | u32::from(raw[2]))
}

/// Write a 24-bit unsigned big-endian integer (low three bytes of `value`).
pub(crate) fn write_u24_be(value: u32, dst: &mut Vec<u8>) {
    dst.push((value >> 16) as u8);
    dst.push((value >> 8) as u8);
    dst.push(value as u8);
}

/// Read a 16-bit unsigned big-endian integer.
pub(crate) fn read_u16_be(bytes: &[u8], context: &'static str) -> Result<u16> {
    let Some(raw) = bytes.get(..2) else {
        return Err(DecodeError::short(context, 2, bytes.len()));
    };
    Ok(u16::from_be_bytes([raw[0], raw[1]]))
}

/// Integer division rounding half away from zero.
fn round_div(value: i64, divisor: i64) -> i64 {
    let quotient = value / divisor;
    let remainder = value % divisor;
    if remainder.abs() * 2 >= divisor {
        quotient + remainder.signum()
    } else {
        quotient
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn decode_two_byte_reading() {
        // precision=1, scale=0, size=2, value=200 -> reading 20.0
        let bytes = [0b001_00_010, 0x00, 0xC8];
        let (value, consumed) = ScaledValue::decode(&bytes).unwrap();
        assert_eq!(consumed, 3);
        assert_eq!(value, ScaledValue { precision: 1, scale: 0, size: 2, value: 200 });
        assert_eq!(value.level(), 20);
    }

    #[test]
    fn negative_reading() {
        // precision=1, size=2, value=-55 -> reading -5.5 rounds to -6
        let bytes = [0b001_00_010, 0xFF, 0xC9];
        let (value, _) = ScaledValue::decode(&bytes).unwrap();
        assert_eq!(value.value, -55);
        assert_eq!(value.level(), -6);
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        let value = ScaledValue { precision: 1, scale: 0, size: 2, value: 25 };
        assert_eq!(value.level(), 3);
        let value = ScaledValue { precision: 1, scale: 0, size: 2, value: 24 };
        assert_eq!(value.level(), 2);
    }

    #[test]
    fn reject_invalid_size() {
        let bytes = [0b000_00_011, 0x00, 0x00, 0x00];
        assert!(matches!(ScaledValue::decode(&bytes), Err(DecodeError::InvalidValueSize(3))));
    }

    #[test]
    fn reject_truncated_value() {
        let bytes = [0b000_00_100, 0x00, 0x01];
        assert!(matches!(ScaledValue::decode(&bytes), Err(DecodeError::BodyTooShort { .. })));
    }

    fn value_in_size(size: u8) -> std::ops::RangeInclusive<i64> {
        match size {
            1 => i64::from(i8::MIN)..=i64::from(i8::MAX),
            2 => i64::from(i16::MIN)..=i64::from(i16::MAX),
            _ => i64::from(i32::MIN)..=i64::from(i32::MAX),
        }
    }

    proptest! {
        #[test]
        fn encode_decode_round_trip(
            precision in 0u8..8,
            scale in 0u8..4,
            size_pick in 0usize..3,
            raw in any::<i64>(),
        ) {
            let size = [1u8, 2, 4][size_pick];
            let range = value_in_size(size);
            let value = raw.rem_euclid(range.end() - range.start() + 1) + range.start();

            let scaled = ScaledValue { precision, scale, size, value };
            let mut wire = Vec::new();
            scaled.encode(&mut wire);

            let (decoded, consumed) = ScaledValue::decode(&wire).unwrap();
            prop_assert_eq!(decoded, scaled);
            prop_assert_eq!(consumed, wire.len());
        }
    }
}
