//! Z/IP packets: the envelope plus its decoded Z-Wave body.
//!
//! [`Datagram::decode`] is the single entry point for inbound UDP payloads:
//! it tells keep-alive frames apart from packets, then parses the envelope,
//! header extensions and body. A [`Packet`] holds both the raw body bytes
//! and the decoded [`ZWaveCommand`] so routing layers can match on either.

use std::time::Duration;

use bytes::Bytes;

use crate::command::ZWaveCommand;
use crate::envelope::{
    encode_delay_extension, parse_extensions, EnvelopeFlags, PacketTypes, ZipHeader,
};
use crate::errors::{DecodeError, Result};

/// Gateway traffic is parked at least this long before a sleeping-node
/// delay is treated as a real mailbox queue rather than radio latency.
const SLEEPING_DELAY_FLOOR: Duration = Duration::from_secs(1);

/// Anything a gateway datagram can decode to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Datagram {
    /// A Z/IP packet (command 0x02)
    Command(Packet),
    /// A Z/IP keep-alive (command 0x03)
    KeepAlive(KeepAlive),
}

impl Datagram {
    /// Decode one UDP payload.
    ///
    /// # Errors
    ///
    /// Fails on frames that are not Z/IP at all, on truncated envelopes or
    /// extension blocks, and on structurally malformed known bodies.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        match bytes {
            [] | [_] => Err(DecodeError::FrameTooShort { expected: 2, actual: bytes.len() }),
            [cc, ..] if *cc != ZipHeader::COMMAND_CLASS_ZIP => Err(DecodeError::NotZipFrame(*cc)),
            [_, cmd, rest @ ..] if *cmd == ZipHeader::ZIP_KEEP_ALIVE => {
                let Some(&flags) = rest.first() else {
                    return Err(DecodeError::FrameTooShort { expected: 3, actual: bytes.len() });
                };
                Ok(Self::KeepAlive(KeepAlive {
                    types: PacketTypes::from_bits_retain(flags),
                }))
            }
            _ => Packet::decode(bytes).map(Self::Command),
        }
    }
}

/// A Z/IP keep-alive frame.
///
/// Keep-alives live outside the sequence-number space: they carry only the
/// ack-request/ack-response bits and are answered immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeepAlive {
    /// Ack bits; only `ACK_REQUEST` and `ACK_RESPONSE` are meaningful
    pub types: PacketTypes,
}

impl KeepAlive {
    /// A keep-alive asking for a response.
    #[must_use]
    pub const fn request() -> Self {
        Self { types: PacketTypes::ACK_REQUEST }
    }

    /// The answer to a keep-alive request.
    #[must_use]
    pub const fn response() -> Self {
        Self { types: PacketTypes::ACK_RESPONSE }
    }

    /// The three-byte wire form.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        vec![ZipHeader::COMMAND_CLASS_ZIP, ZipHeader::ZIP_KEEP_ALIVE, self.types.bits()]
    }
}

/// A parsed Z/IP packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Envelope sequence number
    pub seq_number: u8,
    /// Ack/nack flags
    pub types: PacketTypes,
    /// Structural envelope flags
    pub flags: EnvelopeFlags,
    /// Expected mailbox delay, from the header extension when present
    pub expected_delay: Option<Duration>,
    /// Raw body bytes (empty on pure ack/nack frames)
    pub body: Bytes,
    /// Decoded body, `None` when the body is empty
    pub command: Option<ZWaveCommand>,
}

impl Packet {
    /// Decode a packet datagram (leading bytes already known to be 0x23 0x02).
    ///
    /// # Errors
    ///
    /// Fails on truncated envelopes, malformed extension blocks, and
    /// structurally malformed known bodies.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let header = ZipHeader::from_bytes(bytes)?;
        let mut rest = &bytes[ZipHeader::SIZE..];

        let mut expected_delay = None;
        if header.flags().contains(EnvelopeFlags::HEADER_EXTENSION) {
            let extensions = parse_extensions(rest)?;
            expected_delay = extensions.expected_delay;
            rest = &rest[extensions.consumed..];
        }

        let command = if rest.is_empty() { None } else { Some(ZWaveCommand::decode(rest)?) };

        // The extension block and the body presence are represented by
        // their own fields; the structural bits are re-derived on encode.
        let flags = header.flags()
            & !(EnvelopeFlags::HEADER_EXTENSION | EnvelopeFlags::ZWAVE_CMD_INCLUDED);

        Ok(Self {
            seq_number: header.seq_no(),
            types: header.types(),
            flags,
            expected_delay,
            body: Bytes::copy_from_slice(rest),
            command,
        })
    }

    /// Build an outbound command packet: ack requested, the command encoded
    /// as the body.
    #[must_use]
    pub fn request(seq_number: u8, command: &ZWaveCommand) -> Self {
        let body = command.to_bytes();
        Self {
            seq_number,
            types: PacketTypes::ACK_REQUEST,
            // ZWAVE_CMD_INCLUDED is derived from the body on encode.
            flags: EnvelopeFlags::SECURE_ORIGIN,
            expected_delay: None,
            body: Bytes::from(body),
            command: Some(command.clone()),
        }
    }

    /// Build the acknowledgement for a received packet.
    #[must_use]
    pub fn ack_response(seq_number: u8) -> Self {
        Self {
            seq_number,
            types: PacketTypes::ACK_RESPONSE,
            flags: EnvelopeFlags::empty(),
            expected_delay: None,
            body: Bytes::new(),
            command: None,
        }
    }

    /// Build a nack response with the given nack bits (gateway behavior,
    /// used by test doubles).
    #[must_use]
    pub fn nack(seq_number: u8, types: PacketTypes, expected_delay: Option<Duration>) -> Self {
        Self {
            seq_number,
            types: types | PacketTypes::NACK_RESPONSE,
            // HEADER_EXTENSION is derived from the delay on encode.
            flags: EnvelopeFlags::empty(),
            expected_delay,
            body: Bytes::new(),
            command: None,
        }
    }

    /// Serialize to the wire form.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut flags = self.flags;
        if self.expected_delay.is_some() {
            flags |= EnvelopeFlags::HEADER_EXTENSION;
        }
        if !self.body.is_empty() {
            flags |= EnvelopeFlags::ZWAVE_CMD_INCLUDED;
        }

        let mut out = Vec::with_capacity(ZipHeader::SIZE + 8 + self.body.len());
        out.extend_from_slice(&ZipHeader::with_flags(self.seq_number, self.types, flags).to_bytes());
        if let Some(delay) = self.expected_delay {
            encode_delay_extension(delay, &mut out);
        }
        out.extend_from_slice(&self.body);
        out
    }

    /// True when this response parks the command in the gateway mailbox for
    /// a sleeping node: nack-waiting plus a reported delay long enough to
    /// not just be radio latency.
    #[must_use]
    pub fn sleeping_delay(&self) -> bool {
        self.types.contains(PacketTypes::NACK_WAITING)
            && self.expected_delay.is_some_and(|delay| delay > SLEEPING_DELAY_FLOOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::proxy::NodeListGet;

    #[test]
    fn request_round_trip() {
        let command = ZWaveCommand::NodeListGet(NodeListGet { seq_no: 7 });
        let packet = Packet::request(7, &command);
        let wire = packet.to_bytes();
        assert_eq!(&wire[..7], &[0x23, 0x02, 0x80, 0x50, 0x07, 0x00, 0x00]);
        assert_eq!(&wire[7..], &[0x52, 0x01, 0x07]);

        let Datagram::Command(parsed) = Datagram::decode(&wire).unwrap() else {
            panic!("expected packet");
        };
        assert_eq!(parsed, packet);
    }

    #[test]
    fn ack_response_has_no_body() {
        let wire = Packet::ack_response(9).to_bytes();
        let Datagram::Command(packet) = Datagram::decode(&wire).unwrap() else {
            panic!("expected packet");
        };
        assert_eq!(packet.seq_number, 9);
        assert_eq!(packet.types, PacketTypes::ACK_RESPONSE);
        assert!(packet.command.is_none());
        assert!(packet.body.is_empty());
    }

    #[test]
    fn nack_waiting_with_delay_round_trips() {
        let packet = Packet::nack(
            3,
            PacketTypes::NACK_WAITING,
            Some(Duration::from_secs(600)),
        );
        let wire = packet.to_bytes();

        let Datagram::Command(parsed) = Datagram::decode(&wire).unwrap() else {
            panic!("expected packet");
        };
        assert_eq!(parsed.expected_delay, Some(Duration::from_secs(600)));
        assert!(parsed.types.contains(PacketTypes::NACK_RESPONSE));
        assert!(parsed.types.contains(PacketTypes::NACK_WAITING));
        assert!(parsed.sleeping_delay());
    }

    #[test]
    fn short_delay_is_not_sleeping() {
        let packet = Packet::nack(
            3,
            PacketTypes::NACK_WAITING,
            Some(Duration::from_secs(1)),
        );
        assert!(!packet.sleeping_delay());
    }

    #[test]
    fn keep_alive_round_trip() {
        let wire = KeepAlive::request().to_bytes();
        assert_eq!(wire, vec![0x23, 0x03, 0x80]);
        assert_eq!(
            Datagram::decode(&wire).unwrap(),
            Datagram::KeepAlive(KeepAlive::request())
        );
    }

    #[test]
    fn non_zip_frame_is_rejected() {
        assert!(matches!(
            Datagram::decode(&[0x25, 0x03, 0xFF]),
            Err(DecodeError::NotZipFrame(0x25))
        ));
    }

    #[test]
    fn malformed_known_body_is_an_error() {
        // Sensor report with a truncated value.
        let mut wire = Packet::ack_response(1).to_bytes();
        wire[2] = 0x00; // clear ack bit, make it a plain report push
        wire.extend_from_slice(&[0x31, 0x05, 0x01, 0b001_00_010, 0x00]);
        assert!(Datagram::decode(&wire).is_err());
    }
}
