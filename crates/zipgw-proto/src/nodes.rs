//! Node identifiers and the node-list bitmask.
//!
//! Z-Wave node ids occupy 1..=232. The gateway reports the network's node
//! set as a bitmask where bit `k` of byte `b` (both zero-indexed, LSB first
//! within each byte) stands for node `b * 8 + k + 1`.

use serde::{Deserialize, Serialize};

use crate::errors::{DecodeError, Result};

/// Highest valid Z-Wave node id
pub const MAX_NODE_ID: u8 = 232;

/// Length in bytes of a full node-list bitmask covering nodes 1..=232
pub const NODE_MASK_LEN: usize = 29;

/// A validated Z-Wave node id (1..=232).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u8);

impl NodeId {
    /// Create a node id, rejecting values outside 1..=232.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidNodeId`] for 0 and for 233..=255.
    pub const fn new(raw: u8) -> Result<Self> {
        if raw == 0 || raw > MAX_NODE_ID {
            Err(DecodeError::InvalidNodeId(raw))
        } else {
            Ok(Self(raw))
        }
    }

    /// The raw byte value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for NodeId {
    type Error = DecodeError;

    fn try_from(raw: u8) -> Result<Self> {
        Self::new(raw)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Expand a node-list bitmask into the sorted list of present node ids.
///
/// Bits beyond node 232 (only possible in masks longer than 29 bytes) are
/// ignored, keeping the expansion total on arbitrary gateway input.
#[must_use]
pub fn unmask(mask: &[u8]) -> Vec<NodeId> {
    let mut nodes = Vec::new();
    for (byte_index, byte) in mask.iter().enumerate() {
        for bit in 0..8 {
            if byte & (1 << bit) != 0 {
                let raw = byte_index * 8 + bit + 1;
                if let Ok(raw) = u8::try_from(raw) {
                    if let Ok(node) = NodeId::new(raw) {
                        nodes.push(node);
                    }
                }
            }
        }
    }
    nodes
}

/// Collapse a list of node ids into a bitmask of `len` bytes.
#[must_use]
pub fn to_bitmask(nodes: &[NodeId], len: usize) -> Vec<u8> {
    let mut mask = vec![0u8; len];
    for node in nodes {
        let index = usize::from(node.get()) - 1;
        let (byte, bit) = (index / 8, index % 8);
        if byte < mask.len() {
            mask[byte] |= 1 << bit;
        }
    }
    mask
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn node_id_bounds() {
        assert!(NodeId::new(0).is_err());
        assert!(NodeId::new(1).is_ok());
        assert!(NodeId::new(232).is_ok());
        assert!(matches!(NodeId::new(233), Err(DecodeError::InvalidNodeId(233))));
    }

    #[test]
    fn unmask_first_byte() {
        // Bits 0 and 2 of byte 0: nodes 1 and 3.
        let mut mask = [0u8; NODE_MASK_LEN];
        mask[0] = 0x05;
        let nodes = unmask(&mask);
        assert_eq!(nodes.iter().map(|n| n.get()).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn unmask_crosses_byte_boundary() {
        // Bit 7 of byte 0 is node 8; bit 0 of byte 1 is node 9.
        let mask = [0x80, 0x01];
        let nodes = unmask(&mask);
        assert_eq!(nodes.iter().map(|n| n.get()).collect::<Vec<_>>(), vec![8, 9]);
    }

    #[test]
    fn last_node_lands_in_final_byte() {
        let node = NodeId::new(232).unwrap();
        let mask = to_bitmask(&[node], NODE_MASK_LEN);
        assert_eq!(mask[28], 0x80);
        assert_eq!(unmask(&mask), vec![node]);
    }

    proptest! {
        #[test]
        fn bitmask_round_trip(mask in proptest::collection::vec(any::<u8>(), NODE_MASK_LEN)) {
            let nodes = unmask(&mask);
            prop_assert_eq!(to_bitmask(&nodes, NODE_MASK_LEN), mask);
        }

        #[test]
        fn node_set_round_trip(raw in proptest::collection::btree_set(1u8..=232, 0..64)) {
            let nodes: Vec<NodeId> = raw.iter().map(|&n| NodeId::new(n).unwrap()).collect();
            let mask = to_bitmask(&nodes, NODE_MASK_LEN);
            prop_assert_eq!(unmask(&mask), nodes);
        }
    }
}
