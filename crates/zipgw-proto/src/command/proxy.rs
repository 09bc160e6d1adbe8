//! Network Management Proxy (0x52): node list and node info cache.

use serde::{Deserialize, Serialize};

use crate::command::inclusion::decode_node_info;
use crate::command::{NodeInfo, ZWaveCommand};
use crate::errors::{DecodeError, Result};
use crate::nodes::{self, NodeId, NODE_MASK_LEN};
use crate::registry::{S2KeyMask, Security2Key};

/// Ask for the network's node list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeListGet {
    /// Command sequence number
    pub seq_no: u8,
}

/// The network's node list, expanded from the wire bitmask.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeListReport {
    /// Command sequence number of the get this answers
    pub seq_no: u8,
    /// 0 means the list is current; anything else marks it stale
    pub status: u8,
    /// Node id of the gateway's controller (0 when unknown)
    pub controller_id: u8,
    /// Present nodes, ascending
    pub node_list: Vec<NodeId>,
}

/// Ask for the cached node information of one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfoCachedGet {
    /// Command sequence number
    pub seq_no: u8,
    /// Maximum acceptable cache age, encoded as 2^age minutes (0 = any)
    pub max_age: u8,
    /// Node to look up
    pub node_id: NodeId,
}

/// Cached node information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfoCacheReport {
    /// Command sequence number of the get this answers
    pub seq_no: u8,
    /// Cache status (high nibble of the wire byte)
    pub status: u8,
    /// Age of the entry (low nibble of the wire byte)
    pub age: u8,
    /// Security-2 keys granted to the node
    pub granted_keys: S2KeyMask,
    /// Device classes and supported command classes
    pub info: NodeInfo,
}

impl NodeInfoCacheReport {
    /// The strongest Security-2 key the node was granted, if any.
    #[must_use]
    pub fn highest_security(&self) -> Option<Security2Key> {
        Security2Key::highest(self.granted_keys)
    }
}

impl NodeListGet {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        dst.push(self.seq_no);
    }
}

impl NodeListReport {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        dst.extend_from_slice(&[self.seq_no, self.status, self.controller_id]);
        dst.extend_from_slice(&nodes::to_bitmask(&self.node_list, NODE_MASK_LEN));
    }
}

impl NodeInfoCachedGet {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        dst.extend_from_slice(&[self.seq_no, self.max_age & 0x0F, self.node_id.get()]);
    }
}

impl NodeInfoCacheReport {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        dst.push(self.seq_no);
        dst.push(self.status << 4 | self.age & 0x0F);
        dst.push(self.granted_keys.bits());
        self.info.encode(dst);
    }
}

pub(super) fn decode_node_list_get(rest: &[u8]) -> Result<ZWaveCommand> {
    let [seq_no] = *rest else {
        return Err(DecodeError::short("node list get", 1, rest.len()));
    };
    Ok(ZWaveCommand::NodeListGet(NodeListGet { seq_no }))
}

pub(super) fn decode_node_list_report(rest: &[u8]) -> Result<ZWaveCommand> {
    if rest.len() < 3 {
        return Err(DecodeError::short("node list report", 3, rest.len()));
    }
    Ok(ZWaveCommand::NodeListReport(NodeListReport {
        seq_no: rest[0],
        status: rest[1],
        controller_id: rest[2],
        node_list: nodes::unmask(&rest[3..]),
    }))
}

pub(super) fn decode_node_info_cached_get(rest: &[u8]) -> Result<ZWaveCommand> {
    let [seq_no, max_age, node] = *rest else {
        return Err(DecodeError::short("node info cached get", 3, rest.len()));
    };
    Ok(ZWaveCommand::NodeInfoCachedGet(NodeInfoCachedGet {
        seq_no,
        max_age: max_age & 0x0F,
        node_id: NodeId::new(node)?,
    }))
}

pub(super) fn decode_node_info_cache_report(rest: &[u8]) -> Result<ZWaveCommand> {
    if rest.len() < 3 {
        return Err(DecodeError::short("node info cache report", 3, rest.len()));
    }
    let (info, _) = decode_node_info(&rest[3..], "node info cache report")?;
    Ok(ZWaveCommand::NodeInfoCacheReport(NodeInfoCacheReport {
        seq_no: rest[0],
        status: rest[1] >> 4,
        age: rest[1] & 0x0F,
        granted_keys: S2KeyMask::from_bits_retain(rest[2]),
        info,
    }))
}
