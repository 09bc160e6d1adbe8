//! Scenario tests for the command/runner/coordinator machinery, driven
//! purely through the state machines with no transport attached.

use std::time::{Duration, Instant};

use zipgw_core::coordinator::{CoordinatorAction, NetworkCoordinator, NetworkMode};
use zipgw_core::error::CommandError;
use zipgw_core::ZipConfig;
use zipgw_proto::command::inclusion::{NodeAdd, NodeAddMode, NodeRemove, NodeRemoveMode};
use zipgw_proto::command::management::{DefaultSet, LearnMode, LearnModeSet};
use zipgw_proto::command::switch::BinaryValue;
use zipgw_proto::envelope::PacketTypes;
use zipgw_proto::{Packet, ZWaveCommand};

fn started() -> NetworkCoordinator {
    let config = ZipConfig::new("[fd00::2]:4123".parse().unwrap());
    let mut coordinator = NetworkCoordinator::new(&config, 0x20);
    coordinator.startup_complete();
    coordinator
}

fn count_sends(actions: &[CoordinatorAction]) -> usize {
    actions.iter().filter(|a| matches!(a, CoordinatorAction::SendFrame(_))).count()
}

#[test]
fn retry_on_nack_issues_three_sends_then_fails() {
    let mut coordinator = started();
    let now = Instant::now();

    let (seq, actions) =
        coordinator.dispatch(ZWaveCommand::BasicSet(BinaryValue::On), now).unwrap();
    let mut sends = count_sends(&actions);
    assert_eq!(sends, 1);

    let nack = Packet::nack(seq, PacketTypes::empty(), None);

    // First two nacks are absorbed by the retry budget.
    for _ in 0..2 {
        let actions = coordinator.handle_packet(nack.clone(), now);
        sends += count_sends(&actions);
        assert!(actions.iter().all(|a| matches!(a, CoordinatorAction::SendFrame(_))));
    }

    // The third is terminal.
    let actions = coordinator.handle_packet(nack, now);
    assert!(matches!(
        actions[..],
        [CoordinatorAction::CommandComplete {
            result: Err(CommandError::NackResponse),
            ..
        }]
    ));
    assert_eq!(sends, 3);
    assert_eq!(coordinator.in_flight(), 0);
}

#[test]
fn sleeping_nack_queues_when_idle_but_not_while_configuring() {
    let parked = |seq| {
        Packet::nack(seq, PacketTypes::NACK_WAITING, Some(Duration::from_secs(300)))
    };

    // Idle: the command parks.
    let mut coordinator = started();
    let now = Instant::now();
    let (seq, _) = coordinator.dispatch(ZWaveCommand::BasicSet(BinaryValue::On), now).unwrap();
    let actions = coordinator.handle_packet(parked(seq), now);
    assert!(matches!(actions[..], [CoordinatorAction::CommandQueued { .. }]));

    // ConfiguringNewNode: the same response just keeps the command waiting.
    let mut coordinator = started();
    let (seq, _) = coordinator
        .dispatch(
            ZWaveCommand::NodeAdd(NodeAdd { seq_no: 0, mode: NodeAddMode::AnyS2, tx_options: 0x20 }),
            now,
        )
        .unwrap();
    let done = zipgw_proto::command::inclusion::NodeAddStatus {
        seq_no: seq,
        status: zipgw_proto::command::inclusion::InclusionStatus::Done,
        node_id: zipgw_proto::NodeId::new(9).ok(),
        info: None,
        s2: None,
    };
    coordinator.handle_packet(Packet::request(0xA0, &ZWaveCommand::NodeAddStatus(done)), now);
    assert_eq!(coordinator.mode(), NetworkMode::ConfiguringNewNode);

    let (seq, _) = coordinator.dispatch(ZWaveCommand::BasicSet(BinaryValue::On), now).unwrap();
    let actions = coordinator.handle_packet(parked(seq), now);
    assert!(actions.is_empty(), "expected the command to keep waiting, got {actions:?}");
    assert_eq!(coordinator.in_flight(), 1);
}

#[test]
fn admission_follows_the_mode_gate() {
    let now = Instant::now();
    let device = || ZWaveCommand::BasicSet(BinaryValue::On);
    let include =
        || ZWaveCommand::NodeAdd(NodeAdd { seq_no: 0, mode: NodeAddMode::AnyS2, tx_options: 0x20 });
    let exclude = || ZWaveCommand::NodeRemove(NodeRemove { seq_no: 0, mode: NodeRemoveMode::Any });
    let learn = || ZWaveCommand::LearnModeSet(LearnModeSet { seq_no: 0, mode: LearnMode::Routed });
    let reset = || ZWaveCommand::DefaultSet(DefaultSet { seq_no: 0 });

    // Everything is admissible from idle.
    for request in [device(), include(), exclude(), learn(), reset()] {
        let mut coordinator = started();
        assert!(coordinator.dispatch(request, now).is_ok());
    }

    // While a management operation runs, nothing else is.
    for mode_changer in [include(), exclude(), learn(), reset()] {
        let mut coordinator = started();
        coordinator.dispatch(mode_changer, now).unwrap();
        for refused in [device(), include(), exclude(), learn(), reset()] {
            assert_eq!(
                coordinator.dispatch(refused, now).unwrap_err(),
                CommandError::NetworkBusy
            );
        }
    }
}

#[test]
fn timeouts_and_retries_bound_total_sends() {
    let mut coordinator = started();
    let t0 = Instant::now();
    let timeout = Duration::from_secs(2);

    let (_, actions) = coordinator.dispatch(ZWaveCommand::BasicSet(BinaryValue::On), t0).unwrap();
    let mut sends = count_sends(&actions);

    // Let every deadline lapse; default retries = 2 bounds this at 3 sends.
    let mut now = t0;
    for _ in 0..10 {
        now += timeout;
        let actions = coordinator.tick(now);
        sends += count_sends(&actions);
        if actions
            .iter()
            .any(|a| matches!(a, CoordinatorAction::CommandComplete { result: Err(CommandError::Timeout), .. }))
        {
            break;
        }
    }
    assert_eq!(sends, 3);
    assert_eq!(coordinator.in_flight(), 0);
}

#[test]
fn concurrent_commands_keep_distinct_sequence_numbers() {
    let mut coordinator = started();
    let now = Instant::now();

    let mut seqs = std::collections::HashSet::new();
    for _ in 0..64 {
        let (seq, _) = coordinator.dispatch(ZWaveCommand::BasicSet(BinaryValue::On), now).unwrap();
        assert!(seqs.insert(seq), "sequence number {seq} reused while in flight");
    }
}

#[test]
fn exclusion_round_trip_returns_to_idle() {
    let mut coordinator = started();
    let now = Instant::now();

    let (seq, _) = coordinator
        .dispatch(ZWaveCommand::NodeRemove(NodeRemove { seq_no: 0, mode: NodeRemoveMode::Any }), now)
        .unwrap();
    assert_eq!(coordinator.mode(), NetworkMode::ExcludingNode);

    let status = zipgw_proto::command::inclusion::NodeRemoveStatus {
        seq_no: seq,
        status: zipgw_proto::command::inclusion::InclusionStatus::Done,
        node_id: zipgw_proto::NodeId::new(4).ok(),
    };
    let actions = coordinator
        .handle_packet(Packet::request(0xA1, &ZWaveCommand::NodeRemoveStatus(status)), now);
    assert!(matches!(
        actions[..],
        [CoordinatorAction::CommandComplete { result: Ok(_), .. }]
    ));
    assert_eq!(coordinator.mode(), NetworkMode::Idle);
}
