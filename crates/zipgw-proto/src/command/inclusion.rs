//! Network Management Inclusion (0x34): adding and removing nodes, the
//! Security-2 key-exchange frames, and neighbor updates.
//!
//! The node-add status report is the richest frame in the protocol: device
//! classes, the supported command-class list, and - for secure inclusions -
//! the granted-key tail with the device's DSK.

use serde::{Deserialize, Serialize};

use crate::command::{NodeInfo, ZWaveCommand};
use crate::dsk::Dsk;
use crate::errors::{DecodeError, Result};
use crate::nodes::NodeId;
use crate::registry::{
    parse_command_class_list, BasicDeviceClass, GenericDeviceClass, KexFailType, S2KeyMask,
    SpecificDeviceClass,
};

/// Outcome of an inclusion-style operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InclusionStatus {
    /// Operation completed (0x06)
    Done,
    /// Operation failed (0x07)
    Failed,
    /// Node joined but key exchange failed (0x09)
    SecurityFailed,
    /// Unrecognized status byte
    Unknown(u8),
}

impl InclusionStatus {
    pub(crate) const fn from_byte(byte: u8) -> Self {
        match byte {
            0x06 => Self::Done,
            0x07 => Self::Failed,
            0x09 => Self::SecurityFailed,
            other => Self::Unknown(other),
        }
    }

    pub(crate) const fn to_byte(self) -> u8 {
        match self {
            Self::Done => 0x06,
            Self::Failed => 0x07,
            Self::SecurityFailed => 0x09,
            Self::Unknown(other) => other,
        }
    }
}

/// Outcome of a neighbor-update request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeighborUpdateStatus {
    /// Neighbor discovery completed (0x22)
    Done,
    /// Neighbor discovery failed (0x23)
    Failed,
    /// Unrecognized status byte
    Unknown(u8),
}

impl NeighborUpdateStatus {
    const fn from_byte(byte: u8) -> Self {
        match byte {
            0x22 => Self::Done,
            0x23 => Self::Failed,
            other => Self::Unknown(other),
        }
    }

    const fn to_byte(self) -> u8 {
        match self {
            Self::Done => 0x22,
            Self::Failed => 0x23,
            Self::Unknown(other) => other,
        }
    }
}

/// Node-add mode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeAddMode {
    /// Include any node, no Security-2 bootstrapping (0x01)
    Any,
    /// Abort a running inclusion (0x05)
    Stop,
    /// Include any node with Security-2 bootstrapping (0x07)
    AnyS2,
}

impl NodeAddMode {
    const fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            0x01 => Ok(Self::Any),
            0x05 => Ok(Self::Stop),
            0x07 => Ok(Self::AnyS2),
            other => Err(DecodeError::InvalidField { context: "node add mode", value: other }),
        }
    }

    const fn to_byte(self) -> u8 {
        match self {
            Self::Any => 0x01,
            Self::Stop => 0x05,
            Self::AnyS2 => 0x07,
        }
    }
}

/// Node-remove mode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeRemoveMode {
    /// Exclude any node (0x01)
    Any,
    /// Abort a running exclusion (0x05)
    Stop,
}

impl NodeRemoveMode {
    const fn to_byte(self) -> u8 {
        match self {
            Self::Any => 0x01,
            Self::Stop => 0x05,
        }
    }
}

/// Start or stop an inclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAdd {
    /// Command sequence number (mirrors the envelope's)
    pub seq_no: u8,
    /// What to do
    pub mode: NodeAddMode,
    /// Transmit options byte; 0x20 requests an explore frame
    pub tx_options: u8,
}

/// Start or stop an exclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRemove {
    /// Command sequence number
    pub seq_no: u8,
    /// What to do
    pub mode: NodeRemoveMode,
}

/// Grant (or refuse) the keys a joining node requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAddKeysSet {
    /// Command sequence number
    pub seq_no: u8,
    /// Accept the key request at all
    pub accept: bool,
    /// Grant client-side authentication
    pub grant_csa: bool,
    /// Keys to grant
    pub granted_keys: S2KeyMask,
}

/// Provide the missing DSK digits (the user-entered PIN) during inclusion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAddDskSet {
    /// Command sequence number
    pub seq_no: u8,
    /// Accept and continue the key exchange
    pub accept: bool,
    /// The first DSK bytes the gateway asked for (at most 15)
    pub input: Vec<u8>,
}

/// Ask the gateway to rediscover a node's neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeNeighborUpdateRequest {
    /// Command sequence number
    pub seq_no: u8,
    /// Node to update
    pub node_id: NodeId,
}

/// The Security-2 tail of a node-add status report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct S2Grant {
    /// Keys that ended up granted
    pub granted_keys: S2KeyMask,
    /// Why the key exchange failed, if it did
    pub kex_fail_type: KexFailType,
    /// The device's DSK, when the gateway learned it
    pub dsk: Option<Dsk>,
}

/// Final report of an inclusion.
///
/// Frames carrying an S2 tail also carry a node info block; the decoder
/// relies on that ordering, matching what gateways emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAddStatus {
    /// Command sequence number of the node-add this answers
    pub seq_no: u8,
    /// How the inclusion ended
    pub status: InclusionStatus,
    /// The new node's id; absent on failure
    pub node_id: Option<NodeId>,
    /// Device classes and supported command classes from the NIF
    pub info: Option<NodeInfo>,
    /// Security-2 outcome; present when status is done or security-failed
    pub s2: Option<S2Grant>,
}

/// Final report of an exclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRemoveStatus {
    /// Command sequence number of the node-remove this answers
    pub seq_no: u8,
    /// How the exclusion ended
    pub status: InclusionStatus,
    /// The removed node's id; absent on failure
    pub node_id: Option<NodeId>,
}

/// Report answering a neighbor-update request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeNeighborUpdateStatus {
    /// Command sequence number of the request this answers
    pub seq_no: u8,
    /// How the discovery ended
    pub status: NeighborUpdateStatus,
}

/// Keys a joining node asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAddKeysReport {
    /// Command sequence number
    pub seq_no: u8,
    /// Node asked for client-side authentication
    pub requested_csa: bool,
    /// Keys the node requested
    pub requested_keys: S2KeyMask,
}

/// The joining node's DSK, with the gateway telling us how many leading
/// bytes the user must supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAddDskReport {
    /// Command sequence number
    pub seq_no: u8,
    /// Number of DSK bytes the user must enter (low nibble on the wire)
    pub input_length: u8,
    /// The DSK as far as the gateway knows it
    pub dsk: Dsk,
}

impl NodeAdd {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        dst.extend_from_slice(&[self.seq_no, 0x00, self.mode.to_byte(), self.tx_options]);
    }
}

impl NodeRemove {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        dst.extend_from_slice(&[self.seq_no, 0x00, self.mode.to_byte()]);
    }
}

impl NodeAddKeysSet {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        let flags = u8::from(self.accept) | u8::from(self.grant_csa) << 1;
        dst.extend_from_slice(&[self.seq_no, flags, self.granted_keys.bits()]);
    }
}

impl NodeAddDskSet {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        let flags = u8::from(self.accept) << 7 | (self.input.len() as u8 & 0x0F);
        dst.push(self.seq_no);
        dst.push(flags);
        dst.extend_from_slice(&self.input);
    }
}

impl NodeNeighborUpdateRequest {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        dst.extend_from_slice(&[self.seq_no, self.node_id.get()]);
    }
}

impl NodeAddStatus {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        dst.extend_from_slice(&[
            self.seq_no,
            self.status.to_byte(),
            0x00,
            self.node_id.map_or(0, NodeId::get),
        ]);
        if let Some(info) = &self.info {
            info.encode(dst);
        }
        if let Some(s2) = &self.s2 {
            dst.push(s2.granted_keys.bits());
            dst.push(s2.kex_fail_type.to_byte());
            match &s2.dsk {
                Some(dsk) => {
                    dst.push(Dsk::LENGTH as u8);
                    dst.extend_from_slice(dsk.as_bytes());
                }
                None => dst.push(0),
            }
        }
    }
}

impl NodeRemoveStatus {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        dst.extend_from_slice(&[
            self.seq_no,
            self.status.to_byte(),
            self.node_id.map_or(0, NodeId::get),
        ]);
    }
}

impl NodeNeighborUpdateStatus {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        dst.extend_from_slice(&[self.seq_no, self.status.to_byte()]);
    }
}

impl NodeAddKeysReport {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        dst.extend_from_slice(&[
            self.seq_no,
            u8::from(self.requested_csa),
            self.requested_keys.bits(),
        ]);
    }
}

impl NodeAddDskReport {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        dst.push(self.seq_no);
        dst.push(self.input_length & 0x0F);
        dst.extend_from_slice(self.dsk.as_bytes());
    }
}

pub(super) fn decode_node_add(rest: &[u8]) -> Result<ZWaveCommand> {
    let [seq_no, _reserved, mode, tx_options] = *rest else {
        return Err(DecodeError::short("node add", 4, rest.len()));
    };
    Ok(ZWaveCommand::NodeAdd(NodeAdd {
        seq_no,
        mode: NodeAddMode::from_byte(mode)?,
        tx_options,
    }))
}

pub(super) fn decode_node_remove(rest: &[u8]) -> Result<ZWaveCommand> {
    let [seq_no, _reserved, mode] = *rest else {
        return Err(DecodeError::short("node remove", 3, rest.len()));
    };
    let mode = match mode {
        0x05 => NodeRemoveMode::Stop,
        _ => NodeRemoveMode::Any,
    };
    Ok(ZWaveCommand::NodeRemove(NodeRemove { seq_no, mode }))
}

pub(super) fn decode_node_add_status(rest: &[u8]) -> Result<ZWaveCommand> {
    if rest.len() < 4 {
        return Err(DecodeError::short("node add status", 4, rest.len()));
    }
    let seq_no = rest[0];
    let status = InclusionStatus::from_byte(rest[1]);
    let node_id = NodeId::new(rest[3]).ok();

    let mut info = None;
    let mut tail: &[u8] = &[];
    if rest.len() > 4 {
        let (parsed, nif_len) = decode_node_info(&rest[4..], "node add status")?;
        info = Some(parsed);
        tail = &rest[4 + nif_len..];
    }

    let s2 = if matches!(status, InclusionStatus::Done | InclusionStatus::SecurityFailed)
        && tail.len() >= 3
    {
        let granted_keys = S2KeyMask::from_bits_retain(tail[0]);
        let kex_fail_type = KexFailType::from_byte(tail[1]);
        let dsk_len = usize::from(tail[2]);
        let dsk = match dsk_len {
            0 => None,
            Dsk::LENGTH => {
                let bytes = tail
                    .get(3..3 + Dsk::LENGTH)
                    .ok_or(DecodeError::short("node add status dsk", Dsk::LENGTH, tail.len() - 3))?;
                Some(Dsk::from_slice(bytes)?)
            }
            other => return Err(DecodeError::InvalidDskLength(other)),
        };
        Some(S2Grant { granted_keys, kex_fail_type, dsk })
    } else {
        None
    };

    Ok(ZWaveCommand::NodeAddStatus(NodeAddStatus { seq_no, status, node_id, info, s2 }))
}

pub(super) fn decode_node_remove_status(rest: &[u8]) -> Result<ZWaveCommand> {
    let [seq_no, status, node] = *rest else {
        return Err(DecodeError::short("node remove status", 3, rest.len()));
    };
    let status = InclusionStatus::from_byte(status);
    let node_id = match status {
        InclusionStatus::Failed => None,
        _ => NodeId::new(node).ok(),
    };
    Ok(ZWaveCommand::NodeRemoveStatus(NodeRemoveStatus { seq_no, status, node_id }))
}

pub(super) fn decode_node_neighbor_update_request(rest: &[u8]) -> Result<ZWaveCommand> {
    let [seq_no, node] = *rest else {
        return Err(DecodeError::short("neighbor update request", 2, rest.len()));
    };
    Ok(ZWaveCommand::NodeNeighborUpdateRequest(NodeNeighborUpdateRequest {
        seq_no,
        node_id: NodeId::new(node)?,
    }))
}

pub(super) fn decode_node_neighbor_update_status(rest: &[u8]) -> Result<ZWaveCommand> {
    let [seq_no, status] = *rest else {
        return Err(DecodeError::short("neighbor update status", 2, rest.len()));
    };
    Ok(ZWaveCommand::NodeNeighborUpdateStatus(NodeNeighborUpdateStatus {
        seq_no,
        status: NeighborUpdateStatus::from_byte(status),
    }))
}

pub(super) fn decode_node_add_keys_report(rest: &[u8]) -> Result<ZWaveCommand> {
    let [seq_no, csa, keys] = *rest else {
        return Err(DecodeError::short("keys report", 3, rest.len()));
    };
    Ok(ZWaveCommand::NodeAddKeysReport(NodeAddKeysReport {
        seq_no,
        requested_csa: csa & 0x01 != 0,
        requested_keys: S2KeyMask::from_bits_retain(keys),
    }))
}

pub(super) fn decode_node_add_keys_set(rest: &[u8]) -> Result<ZWaveCommand> {
    let [seq_no, flags, keys] = *rest else {
        return Err(DecodeError::short("keys set", 3, rest.len()));
    };
    Ok(ZWaveCommand::NodeAddKeysSet(NodeAddKeysSet {
        seq_no,
        accept: flags & 0x01 != 0,
        grant_csa: flags & 0x02 != 0,
        granted_keys: S2KeyMask::from_bits_retain(keys),
    }))
}

pub(super) fn decode_node_add_dsk_report(rest: &[u8]) -> Result<ZWaveCommand> {
    if rest.len() < 2 + Dsk::LENGTH {
        return Err(DecodeError::short("dsk report", 2 + Dsk::LENGTH, rest.len()));
    }
    Ok(ZWaveCommand::NodeAddDskReport(NodeAddDskReport {
        seq_no: rest[0],
        input_length: rest[1] & 0x0F,
        dsk: Dsk::from_slice(&rest[2..2 + Dsk::LENGTH])?,
    }))
}

pub(super) fn decode_node_add_dsk_set(rest: &[u8]) -> Result<ZWaveCommand> {
    if rest.len() < 2 {
        return Err(DecodeError::short("dsk set", 2, rest.len()));
    }
    let input_length = usize::from(rest[1] & 0x0F);
    let input = rest
        .get(2..2 + input_length)
        .ok_or(DecodeError::short("dsk set input", input_length, rest.len() - 2))?;
    Ok(ZWaveCommand::NodeAddDskSet(NodeAddDskSet {
        seq_no: rest[0],
        accept: rest[1] & 0x80 != 0,
        input: input.to_vec(),
    }))
}

/// Parse a node info block: `[len, capability, security, basic, generic,
/// specific, classes...]` where `len` counts itself. Returns the info plus
/// the number of bytes consumed.
pub(super) fn decode_node_info(
    bytes: &[u8],
    context: &'static str,
) -> Result<(NodeInfo, usize)> {
    let Some(&len_byte) = bytes.first() else {
        return Err(DecodeError::short(context, 1, 0));
    };
    let nif_len = usize::from(len_byte);
    if nif_len < 6 || bytes.len() < nif_len {
        return Err(DecodeError::short(context, nif_len.max(6), bytes.len()));
    }

    let generic = GenericDeviceClass::from_byte(bytes[4]);
    let info = NodeInfo {
        listening: bytes[1] & 0x80 != 0,
        basic_class: BasicDeviceClass::from_byte(bytes[3]),
        generic_class: generic,
        specific_class: SpecificDeviceClass::from_bytes(generic, bytes[5]),
        command_classes: parse_command_class_list(&bytes[6..nif_len]),
    };
    Ok((info, nif_len))
}
