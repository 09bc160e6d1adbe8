//! Association (0x85): group membership management.

use serde::{Deserialize, Serialize};

use crate::command::ZWaveCommand;
use crate::errors::{DecodeError, Result};
use crate::nodes::NodeId;

/// A group with member nodes; shared by set and remove.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationMembers {
    /// Association group, 1-based
    pub group: u8,
    /// Member node ids
    pub nodes: Vec<NodeId>,
}

/// Current members of an association group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationReport {
    /// Association group, 1-based
    pub group: u8,
    /// Maximum members the group supports
    pub max_nodes: u8,
    /// Reports still to come when the member list spans frames
    pub reports_to_follow: u8,
    /// Current member node ids
    pub nodes: Vec<NodeId>,
}

impl AssociationMembers {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        dst.push(self.group);
        dst.extend(self.nodes.iter().map(|n| n.get()));
    }
}

impl AssociationReport {
    pub(super) fn encode_payload(&self, dst: &mut Vec<u8>) {
        dst.extend_from_slice(&[self.group, self.max_nodes, self.reports_to_follow]);
        dst.extend(self.nodes.iter().map(|n| n.get()));
    }
}

fn decode_nodes(bytes: &[u8]) -> Result<Vec<NodeId>> {
    bytes.iter().map(|&b| NodeId::new(b)).collect()
}

pub(super) fn decode_members(rest: &[u8], context: &'static str) -> Result<AssociationMembers> {
    let Some((&group, nodes)) = rest.split_first() else {
        return Err(DecodeError::short(context, 1, 0));
    };
    Ok(AssociationMembers { group, nodes: decode_nodes(nodes)? })
}

pub(super) fn decode_get(rest: &[u8]) -> Result<u8> {
    let Some(&group) = rest.first() else {
        return Err(DecodeError::short("association get", 1, 0));
    };
    Ok(group)
}

pub(super) fn decode_report(rest: &[u8]) -> Result<ZWaveCommand> {
    if rest.len() < 3 {
        return Err(DecodeError::short("association report", 3, rest.len()));
    }
    Ok(ZWaveCommand::AssociationReport(AssociationReport {
        group: rest[0],
        max_nodes: rest[1],
        reports_to_follow: rest[2],
        nodes: decode_nodes(&rest[3..])?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: u8) -> NodeId {
        NodeId::new(id).unwrap()
    }

    #[test]
    fn report_round_trip() {
        let report = AssociationReport {
            group: 1,
            max_nodes: 5,
            reports_to_follow: 0,
            nodes: vec![node(1), node(7)],
        };
        let bytes = ZWaveCommand::AssociationReport(report.clone()).to_bytes();
        assert_eq!(bytes, vec![0x85, 0x03, 0x01, 0x05, 0x00, 0x01, 0x07]);
        assert_eq!(
            ZWaveCommand::decode(&bytes).unwrap(),
            ZWaveCommand::AssociationReport(report)
        );
    }

    #[test]
    fn set_round_trip() {
        let command = ZWaveCommand::AssociationSet(AssociationMembers {
            group: 2,
            nodes: vec![node(3)],
        });
        let bytes = command.to_bytes();
        assert_eq!(bytes, vec![0x85, 0x01, 0x02, 0x03]);
        assert_eq!(ZWaveCommand::decode(&bytes).unwrap(), command);
    }

    #[test]
    fn report_rejects_invalid_member() {
        let body = [0x85, 0x03, 0x01, 0x05, 0x00, 0x00];
        assert!(ZWaveCommand::decode(&body).is_err());
    }
}
