//! Frame builders for playing the gateway's side of the protocol.

use std::time::Duration;

use zipgw_proto::envelope::PacketTypes;
use zipgw_proto::{Datagram, Packet, ZWaveCommand};

/// Acknowledge the client frame with the given envelope sequence number.
#[must_use]
pub fn ack(seq_no: u8) -> Vec<u8> {
    Packet::ack_response(seq_no).to_bytes()
}

/// Refuse the client frame outright.
#[must_use]
pub fn nack(seq_no: u8) -> Vec<u8> {
    Packet::nack(seq_no, PacketTypes::empty(), None).to_bytes()
}

/// Park the client frame for a sleeping node, reporting the expected
/// mailbox delay.
#[must_use]
pub fn nack_waiting(seq_no: u8, delay: Duration) -> Vec<u8> {
    Packet::nack(seq_no, PacketTypes::NACK_WAITING, Some(delay)).to_bytes()
}

/// Push a command to the client under the gateway's own envelope sequence
/// number (asking for an ack, as real gateways do).
#[must_use]
pub fn push(gateway_seq: u8, command: &ZWaveCommand) -> Vec<u8> {
    Packet::request(gateway_seq, command).to_bytes()
}

/// Decode a client datagram into its packet, if it is one.
#[must_use]
pub fn request(datagram: &[u8]) -> Option<Packet> {
    match Datagram::decode(datagram) {
        Ok(Datagram::Command(packet)) => Some(packet),
        _ => None,
    }
}

/// The client's command, when the datagram carries one. Pure ack/nack
/// frames and keep-alives come back as `None`.
#[must_use]
pub fn command(datagram: &[u8]) -> Option<ZWaveCommand> {
    request(datagram).and_then(|packet| packet.command)
}
