//! Full Security-2 inclusion flow against a scripted gateway:
//! node add -> key request -> key grant -> DSK challenge -> DSK input ->
//! final status -> new-node configuration -> idle.

use std::sync::Arc;

use zipgw_core::client::ClientEvent;
use zipgw_core::coordinator::NetworkMode;
use zipgw_core::error::{CommandError, CommandOutcome};
use zipgw_core::{ZipClient, ZipConfig};
use zipgw_harness::{gateway, ScriptedTransport, SimEnv};
use zipgw_proto::command::inclusion::{
    InclusionStatus, NodeAddDskReport, NodeAddKeysReport, NodeAddStatus, S2Grant,
};
use zipgw_proto::command::NodeInfo;
use zipgw_proto::registry::{
    BasicDeviceClass, CommandClass, GenericDeviceClass, KexFailType, S2KeyMask,
    SpecificDeviceClass,
};
use zipgw_proto::{Dsk, NodeId, ZWaveCommand};

fn config() -> ZipConfig {
    ZipConfig::new("[fd00::2]:4123".parse().unwrap())
}

fn joining_node_info() -> NodeInfo {
    NodeInfo {
        listening: true,
        basic_class: BasicDeviceClass::RoutingSlave,
        generic_class: GenericDeviceClass::SwitchBinary,
        specific_class: SpecificDeviceClass::PowerSwitchBinary,
        command_classes: vec![CommandClass::SwitchBinary, CommandClass::Basic],
    }
}

/// A scripted gateway walking the whole S2 inclusion: each client frame
/// advances the exchange one step.
fn inclusion_gateway(dsk: Dsk) -> ScriptedTransport {
    let mut add_seq = None;
    let mut gateway_seq = 0xA0u8;
    ScriptedTransport::new(move |datagram| {
        let Some(packet) = gateway::request(datagram) else {
            return Vec::new();
        };
        let mut push = |command: &ZWaveCommand| {
            let frame = gateway::push(gateway_seq, command);
            gateway_seq = gateway_seq.wrapping_add(1);
            frame
        };

        match &packet.command {
            Some(ZWaveCommand::NodeAdd(add)) => {
                add_seq = Some(add.seq_no);
                let keys = ZWaveCommand::NodeAddKeysReport(NodeAddKeysReport {
                    seq_no: add.seq_no,
                    requested_csa: false,
                    requested_keys: S2KeyMask::AUTHENTICATED,
                });
                vec![gateway::ack(packet.seq_number), push(&keys)]
            }
            Some(ZWaveCommand::NodeAddKeysSet(_)) => {
                let challenge = ZWaveCommand::NodeAddDskReport(NodeAddDskReport {
                    seq_no: add_seq.unwrap_or_default(),
                    input_length: 2,
                    dsk,
                });
                vec![gateway::ack(packet.seq_number), push(&challenge)]
            }
            Some(ZWaveCommand::NodeAddDskSet(_)) => {
                let status = ZWaveCommand::NodeAddStatus(NodeAddStatus {
                    seq_no: add_seq.unwrap_or_default(),
                    status: InclusionStatus::Done,
                    node_id: NodeId::new(12).ok(),
                    info: Some(joining_node_info()),
                    s2: Some(S2Grant {
                        granted_keys: S2KeyMask::AUTHENTICATED,
                        kex_fail_type: KexFailType::None,
                        dsk: Some(dsk),
                    }),
                });
                vec![gateway::ack(packet.seq_number), push(&status)]
            }
            _ => Vec::new(),
        }
    })
}

#[tokio::test(start_paused = true)]
async fn secure_inclusion_flow() {
    let dsk: Dsk = "50285-18819-09924-30691-15973-33711-04005-03623".parse().unwrap();
    let transport = inclusion_gateway(dsk);
    let client = Arc::new(ZipClient::with_transport(config(), transport, SimEnv::new()));
    let mut events = client.subscribe();

    let include = tokio::spawn({
        let client = Arc::clone(&client);
        async move { client.include_node().await }
    });

    // The joining node asks for keys.
    let ClientEvent::Unsolicited(packet) = events.recv().await.unwrap() else {
        panic!("expected an unsolicited key request");
    };
    let Some(ZWaveCommand::NodeAddKeysReport(keys)) = packet.command else {
        panic!("expected a key request, got {:?}", packet.command);
    };
    assert_eq!(keys.requested_keys, S2KeyMask::AUTHENTICATED);
    assert_eq!(
        client.grant_s2_keys(keys.requested_keys, false).await.unwrap(),
        CommandOutcome::Ack
    );

    // The gateway challenges for the DSK's missing digits.
    let ClientEvent::Unsolicited(packet) = events.recv().await.unwrap() else {
        panic!("expected an unsolicited dsk challenge");
    };
    let Some(ZWaveCommand::NodeAddDskReport(challenge)) = packet.command else {
        panic!("expected a dsk challenge, got {:?}", packet.command);
    };
    assert_eq!(challenge.input_length, 2);
    let pin = challenge.dsk.pin().to_be_bytes().to_vec();
    assert_eq!(client.set_s2_dsk(pin).await.unwrap(), CommandOutcome::Ack);

    // The inclusion resolves with the final status report.
    let outcome = include.await.unwrap().unwrap();
    let CommandOutcome::Report(ZWaveCommand::NodeAddStatus(status)) = outcome else {
        panic!("expected a node add status, got {outcome:?}");
    };
    assert_eq!(status.status, InclusionStatus::Done);
    assert_eq!(status.node_id, NodeId::new(12).ok());
    let s2 = status.s2.unwrap();
    assert_eq!(s2.granted_keys, S2KeyMask::AUTHENTICATED);
    assert_eq!(s2.dsk, Some(dsk));

    // Mode went to new-node configuration; a second inclusion is refused
    // until the interview is declared over.
    assert_eq!(client.mode().await.unwrap(), NetworkMode::ConfiguringNewNode);
    assert_eq!(client.include_node().await.unwrap_err(), CommandError::NetworkBusy);

    client.configuration_done().await.unwrap();
    assert_eq!(client.mode().await.unwrap(), NetworkMode::Idle);

    Arc::try_unwrap(client).map_err(|_| "client still shared").unwrap().close().await;
}

#[tokio::test(start_paused = true)]
async fn failed_inclusion_returns_to_idle() {
    let transport = ScriptedTransport::new(move |datagram| {
        let Some(packet) = gateway::request(datagram) else {
            return Vec::new();
        };
        match &packet.command {
            Some(ZWaveCommand::NodeAdd(add)) => {
                let status = ZWaveCommand::NodeAddStatus(NodeAddStatus {
                    seq_no: add.seq_no,
                    status: InclusionStatus::Failed,
                    node_id: None,
                    info: None,
                    s2: None,
                });
                vec![gateway::ack(packet.seq_number), gateway::push(0xB0, &status)]
            }
            _ => Vec::new(),
        }
    });
    let client = ZipClient::with_transport(config(), transport, SimEnv::new());

    let outcome = client.include_node().await.unwrap();
    let CommandOutcome::Report(ZWaveCommand::NodeAddStatus(status)) = outcome else {
        panic!("expected a node add status");
    };
    assert_eq!(status.status, InclusionStatus::Failed);
    assert_eq!(client.mode().await.unwrap(), NetworkMode::Idle);

    client.close().await;
}
