//! Node list retrieval against a scripted gateway.

use zipgw_core::error::CommandError;
use zipgw_core::{ZipClient, ZipConfig};
use zipgw_harness::{gateway, ScriptedTransport, SimEnv};
use zipgw_proto::command::proxy::NodeListReport;
use zipgw_proto::envelope::PacketTypes;
use zipgw_proto::{NodeId, ZWaveCommand};

fn config() -> ZipConfig {
    ZipConfig::new("[fd00::2]:4123".parse().unwrap())
}

fn nodes(ids: &[u8]) -> Vec<NodeId> {
    ids.iter().map(|&id| NodeId::new(id).unwrap()).collect()
}

#[tokio::test(start_paused = true)]
async fn node_list_round_trip() {
    let transport = ScriptedTransport::new(|datagram| {
        let Some(packet) = gateway::request(datagram) else {
            return Vec::new();
        };
        match &packet.command {
            Some(ZWaveCommand::NodeListGet(get)) => {
                let report = ZWaveCommand::NodeListReport(NodeListReport {
                    seq_no: get.seq_no,
                    status: 0,
                    controller_id: 1,
                    node_list: nodes(&[1, 3]),
                });
                vec![gateway::ack(packet.seq_number), gateway::push(0xA0, &report)]
            }
            _ => Vec::new(),
        }
    });

    let client = ZipClient::with_transport(config(), transport.clone(), SimEnv::new());
    let list = client.get_node_list().await.unwrap();
    assert_eq!(list, nodes(&[1, 3]));

    // The pushed report asked for an ack and the client answered it.
    let sent = transport.sent();
    let acked_push = sent.iter().filter_map(|d| gateway::request(d)).any(|p| {
        p.seq_number == 0xA0 && p.types.contains(PacketTypes::ACK_RESPONSE)
    });
    assert!(acked_push, "client did not acknowledge the pushed report");

    client.close().await;
}

#[tokio::test(start_paused = true)]
async fn silent_gateway_times_out_after_three_sends() {
    let transport = ScriptedTransport::silent();
    let client = ZipClient::with_transport(config(), transport.clone(), SimEnv::new());

    let result = client.get_node_list().await;
    assert_eq!(result.unwrap_err(), CommandError::Timeout);

    // Initial send plus two retries, nothing else.
    assert_eq!(transport.sent().len(), 3);

    client.close().await;
}

#[tokio::test(start_paused = true)]
async fn nack_without_retries_left_fails() {
    let transport = ScriptedTransport::new(|datagram| {
        gateway::request(datagram)
            .map(|packet| vec![gateway::nack(packet.seq_number)])
            .unwrap_or_default()
    });
    let client = ZipClient::with_transport(config(), transport.clone(), SimEnv::new());

    let result = client.get_node_list().await;
    assert_eq!(result.unwrap_err(), CommandError::NackResponse);
    assert_eq!(transport.sent().len(), 3);

    client.close().await;
}
