//! Z/IP packet envelope: the fixed prefix carried by every gateway datagram.
//!
//! The envelope is a seven-byte raw binary prefix:
//!
//! ```text
//! [0x23] [0x02] [flags1] [flags2] [seq_no] [src_ep] [dst_ep]
//! ```
//!
//! `flags1` bit-packs the ack/nack flags ([`PacketTypes`]), `flags2` the
//! structural flags ([`EnvelopeFlags`]). When `flags2` announces header
//! extensions, a length-prefixed TLV block sits between the prefix and the
//! Z-Wave body; the only extension this layer interprets is the *expected
//! delay* the gateway reports for frames parked in its mailbox for a
//! sleeping node. Unknown TLVs are skipped by their length byte.
//!
//! The header struct stores raw bytes and is cast directly from network
//! input; all 7-byte patterns have a valid layout, so parsing validates only
//! the leading command-class pair.

use std::time::Duration;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::errors::{DecodeError, Result};

bitflags! {
    /// Ack/nack flag bits from the third envelope byte.
    ///
    /// A request frame carries `ACK_REQUEST`; the gateway answers with one
    /// response frame whose flags describe the outcome. `NACK_WAITING`
    /// arrives combined with `NACK_RESPONSE` and means the frame was parked
    /// for a sleeping node rather than refused.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct PacketTypes: u8 {
        /// Sender asks for an acknowledgement
        const ACK_REQUEST = 0x80;

        /// Frame was accepted
        const ACK_RESPONSE = 0x40;

        /// Frame was refused
        const NACK_RESPONSE = 0x20;

        /// Frame is parked for delayed delivery
        const NACK_WAITING = 0x10;

        /// Gateway mailbox is full
        const NACK_QUEUE_FULL = 0x08;

        /// A critical header option was not understood
        const NACK_OPTION_ERROR = 0x04;
    }
}

bitflags! {
    /// Structural flag bits from the fourth envelope byte.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct EnvelopeFlags: u8 {
        /// A header-extension block follows the prefix
        const HEADER_EXTENSION = 0x80;

        /// A Z-Wave command body follows
        const ZWAVE_CMD_INCLUDED = 0x40;

        /// More fragments of this report follow
        const MORE_INFORMATION = 0x20;

        /// Frame originated from a secure channel
        const SECURE_ORIGIN = 0x10;
    }
}

/// Fixed seven-byte Z/IP envelope prefix (raw binary)
///
/// Fields are stored as raw bytes so the struct can be cast straight from an
/// untrusted datagram without copying. Accessor methods interpret the flag
/// bytes; [`ZipHeader::from_bytes`] validates the command-class pair.
#[repr(C, packed)]
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct ZipHeader {
    command_class: u8,
    command: u8,
    flags1: u8,
    flags2: u8,
    seq_no: u8,
    source_endpoint: u8,
    dest_endpoint: u8,
}

impl ZipHeader {
    /// Size of the serialized prefix
    pub const SIZE: usize = 7;

    /// The Z/IP command class byte
    pub const COMMAND_CLASS_ZIP: u8 = 0x23;

    /// Z/IP packet command byte
    pub const ZIP_PACKET: u8 = 0x02;

    /// Z/IP keep-alive command byte
    pub const ZIP_KEEP_ALIVE: u8 = 0x03;

    /// Build the header for an outbound command frame.
    ///
    /// Requests ask for an acknowledgement and announce an included Z-Wave
    /// command from a secure origin; endpoints are zero (root device).
    #[must_use]
    pub fn request(seq_no: u8) -> Self {
        Self {
            command_class: Self::COMMAND_CLASS_ZIP,
            command: Self::ZIP_PACKET,
            flags1: PacketTypes::ACK_REQUEST.bits(),
            flags2: (EnvelopeFlags::ZWAVE_CMD_INCLUDED | EnvelopeFlags::SECURE_ORIGIN).bits(),
            seq_no,
            source_endpoint: 0,
            dest_endpoint: 0,
        }
    }

    /// Build a header with explicit flag bytes (responses, gateway frames).
    #[must_use]
    pub fn with_flags(seq_no: u8, types: PacketTypes, flags: EnvelopeFlags) -> Self {
        Self {
            command_class: Self::COMMAND_CLASS_ZIP,
            command: Self::ZIP_PACKET,
            flags1: types.bits(),
            flags2: flags.bits(),
            seq_no,
            source_endpoint: 0,
            dest_endpoint: 0,
        }
    }

    /// Parse the prefix from network bytes (zero-copy)
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer is shorter than [`ZipHeader::SIZE`], if
    /// the leading command class is not 0x23, or if the Z/IP command byte is
    /// not the packet command. Keep-alive frames are handled one level up by
    /// [`crate::packet::Datagram::decode`] before this is called.
    pub fn from_bytes(bytes: &[u8]) -> Result<&Self> {
        let header = Self::ref_from_prefix(bytes)
            .map_err(|_| DecodeError::FrameTooShort { expected: Self::SIZE, actual: bytes.len() })?
            .0;

        if header.command_class != Self::COMMAND_CLASS_ZIP {
            return Err(DecodeError::NotZipFrame(header.command_class));
        }
        if header.command != Self::ZIP_PACKET {
            return Err(DecodeError::UnknownZipCommand(header.command));
        }

        Ok(header)
    }

    /// Serialize to the wire form
    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out.copy_from_slice(self.as_bytes());
        out
    }

    /// Sequence number
    #[must_use]
    pub fn seq_no(&self) -> u8 {
        self.seq_no
    }

    /// Ack/nack flags
    #[must_use]
    pub fn types(&self) -> PacketTypes {
        PacketTypes::from_bits_retain(self.flags1)
    }

    /// Structural flags
    #[must_use]
    pub fn flags(&self) -> EnvelopeFlags {
        EnvelopeFlags::from_bits_retain(self.flags2)
    }
}

impl std::fmt::Debug for ZipHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZipHeader")
            .field("seq_no", &self.seq_no())
            .field("types", &self.types())
            .field("flags", &self.flags())
            .finish()
    }
}

/// Header-extension TLV type for the expected mailbox delay
const EXT_EXPECTED_DELAY: u8 = 0x01;

/// Bit marking a header-extension option as critical
const EXT_CRITICAL: u8 = 0x80;

/// Parsed header-extension block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Extensions {
    /// Expected delay before a parked frame is delivered
    pub expected_delay: Option<Duration>,
    /// Total bytes the block occupied, including its length byte
    pub consumed: usize,
}

/// Parse the header-extension block that follows the prefix.
///
/// The first byte is the total block length including itself; the remainder
/// is a sequence of `[type, length, value...]` options. Unknown options are
/// skipped by their length byte, critical or not - this layer records what
/// it understands and leaves policy to the caller.
pub(crate) fn parse_extensions(bytes: &[u8]) -> Result<Extensions> {
    let Some(&block_len) = bytes.first() else {
        return Err(DecodeError::TruncatedExtensions { claimed: 1, available: 0 });
    };
    let block_len = block_len as usize;
    if block_len == 0 || bytes.len() < block_len {
        return Err(DecodeError::TruncatedExtensions { claimed: block_len, available: bytes.len() });
    }

    let mut expected_delay = None;
    let mut tlvs = &bytes[1..block_len];
    while !tlvs.is_empty() {
        if tlvs.len() < 2 {
            return Err(DecodeError::TruncatedExtensions {
                claimed: block_len,
                available: bytes.len(),
            });
        }
        let (option, len) = (tlvs[0], tlvs[1] as usize);
        let Some(value) = tlvs.get(2..2 + len) else {
            return Err(DecodeError::TruncatedExtensions {
                claimed: block_len,
                available: bytes.len(),
            });
        };

        if option & !EXT_CRITICAL == EXT_EXPECTED_DELAY && len == 3 {
            let seconds = u32::from(value[0]) << 16 | u32::from(value[1]) << 8 | u32::from(value[2]);
            expected_delay = Some(Duration::from_secs(u64::from(seconds)));
        }

        tlvs = &tlvs[2 + len..];
    }

    Ok(Extensions { expected_delay, consumed: block_len })
}

/// Encode an expected-delay extension block (gateway side; used by tests).
pub(crate) fn encode_delay_extension(delay: Duration, dst: &mut Vec<u8>) {
    let seconds = u32::try_from(delay.as_secs()).unwrap_or(u32::MAX).min(0x00FF_FFFF);
    dst.push(6); // block length including this byte
    dst.push(EXT_EXPECTED_DELAY);
    dst.push(3);
    dst.push((seconds >> 16) as u8);
    dst.push((seconds >> 8) as u8);
    dst.push(seconds as u8);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_header_layout() {
        let header = ZipHeader::request(0x42);
        assert_eq!(header.to_bytes(), [0x23, 0x02, 0x80, 0x50, 0x42, 0x00, 0x00]);
    }

    #[test]
    fn header_round_trip() {
        let header =
            ZipHeader::with_flags(7, PacketTypes::ACK_RESPONSE, EnvelopeFlags::SECURE_ORIGIN);
        let bytes = header.to_bytes();
        let parsed = ZipHeader::from_bytes(&bytes).unwrap();
        assert_eq!(parsed.seq_no(), 7);
        assert_eq!(parsed.types(), PacketTypes::ACK_RESPONSE);
        assert_eq!(parsed.flags(), EnvelopeFlags::SECURE_ORIGIN);
    }

    #[test]
    fn reject_wrong_command_class() {
        let bytes = [0x25, 0x02, 0, 0, 0, 0, 0];
        assert!(matches!(ZipHeader::from_bytes(&bytes), Err(DecodeError::NotZipFrame(0x25))));
    }

    #[test]
    fn reject_short_prefix() {
        let bytes = [0x23, 0x02, 0x80];
        assert!(matches!(
            ZipHeader::from_bytes(&bytes),
            Err(DecodeError::FrameTooShort { expected: 7, actual: 3 })
        ));
    }

    #[test]
    fn expected_delay_extension_round_trip() {
        let mut block = Vec::new();
        encode_delay_extension(Duration::from_secs(4200), &mut block);

        let parsed = parse_extensions(&block).unwrap();
        assert_eq!(parsed.expected_delay, Some(Duration::from_secs(4200)));
        assert_eq!(parsed.consumed, block.len());
    }

    #[test]
    fn unknown_extensions_are_skipped() {
        // [len=10] [opt 0x7E len 2 aa bb] [opt 0x01 len 3 delay]
        let block = [10, 0x7E, 2, 0xAA, 0xBB, 0x01, 3, 0x00, 0x00, 0x05];
        let parsed = parse_extensions(&block).unwrap();
        assert_eq!(parsed.expected_delay, Some(Duration::from_secs(5)));
    }

    #[test]
    fn truncated_extension_block() {
        let block = [5, 0x01, 3, 0x00];
        assert!(matches!(
            parse_extensions(&block),
            Err(DecodeError::TruncatedExtensions { claimed: 5, available: 4 })
        ));
    }
}
