//! The network coordinator: the serial brain of the client.
//!
//! One coordinator owns the sequence-number space, the `seq -> runner`
//! routing table and the process-wide network mode. It is a pure state
//! machine like everything beneath it: the driver feeds it requests,
//! packets and ticks, and executes the [`CoordinatorAction`]s it returns.
//!
//! # Mode machine
//!
//! ```text
//! NotReady ──startup──► Idle ◄───────────────────────────────┐
//!                        │  ▲                                │
//!          node add      │  │ status failed     configuration_done
//!                        ▼  │                                │
//!                 IncludingNode ──status done──► ConfiguringNewNode
//!
//! Idle ◄──► ExcludingNode     Idle ◄──► LearnMode     Idle ◄──► DefaultSetting
//! ```
//!
//! At most one mode-changing command runs at a time; ordinary device
//! traffic is admitted in `Idle` and `ConfiguringNewNode` only. Admission
//! and the mode transition happen in one call, so concurrent admissions
//! cannot interleave - the coordinator is driven from a single task.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use bytes::Bytes;
use zipgw_proto::command::inclusion::{InclusionStatus, NodeAddMode};
use zipgw_proto::{Packet, ZWaveCommand};

use crate::command::Command;
use crate::config::ZipConfig;
use crate::error::{CommandError, CommandOutcome, CommandResult};
use crate::runner::{CommandRunner, RunnerAction};

/// Process-wide network mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkMode {
    /// Startup incomplete or transport lost
    NotReady,
    /// Ready for any operation
    Idle,
    /// An inclusion is running
    IncludingNode,
    /// An exclusion is running
    ExcludingNode,
    /// A node was just included; its interview traffic is running
    ConfiguringNewNode,
    /// The controller is in learn mode
    LearnMode,
    /// A factory reset is running
    DefaultSetting,
}

/// Effects the driver executes on the coordinator's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorAction {
    /// Send this datagram to the gateway
    SendFrame(Bytes),
    /// A command was parked for a sleeping node; answer its caller with
    /// `Queued` but keep the runner alive
    CommandQueued {
        /// Sequence number of the parked command
        seq_no: u8,
    },
    /// A command finished; deliver its result
    CommandComplete {
        /// Sequence number now released
        seq_no: u8,
        /// Terminal result
        result: CommandResult,
    },
    /// Nobody owns this packet; hand it to subscribers
    Unsolicited(Packet),
}

/// The coordinator state machine.
pub struct NetworkCoordinator {
    mode: NetworkMode,
    seq_counter: u8,
    runners: HashMap<u8, CommandRunner>,
    /// Sequence number of the running mode-changing command, if any
    mode_owner: Option<u8>,
    send_timeout: Duration,
    default_retries: u8,
}

impl NetworkCoordinator {
    /// Build a coordinator in `NotReady`. The initial sequence number is
    /// injected (randomized by the driver) so restarts do not collide with
    /// stale responses to a previous process.
    #[must_use]
    pub fn new(config: &ZipConfig, initial_seq: u8) -> Self {
        Self {
            mode: NetworkMode::NotReady,
            seq_counter: initial_seq,
            runners: HashMap::new(),
            mode_owner: None,
            send_timeout: config.send_timeout,
            default_retries: config.default_retries,
        }
    }

    /// Startup finished; begin admitting commands.
    pub fn startup_complete(&mut self) {
        if self.mode == NetworkMode::NotReady {
            self.mode = NetworkMode::Idle;
            tracing::debug!("coordinator ready");
        }
    }

    /// Current network mode.
    #[must_use]
    pub fn mode(&self) -> NetworkMode {
        self.mode
    }

    /// Number of in-flight commands.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.runners.len()
    }

    /// Admit a request: check the mode gate, allocate a sequence number,
    /// apply the exec-state transition and issue the first send.
    ///
    /// # Errors
    ///
    /// - [`CommandError::NotReady`] before startup or after transport loss
    /// - [`CommandError::NetworkBusy`] when the mode gate refuses the
    ///   command or another mode-changing command is running
    /// - [`CommandError::InvalidParam`] from parameter validation
    pub fn dispatch(
        &mut self,
        request: ZWaveCommand,
        now: Instant,
    ) -> Result<(u8, Vec<CoordinatorAction>), CommandError> {
        if self.mode == NetworkMode::NotReady {
            return Err(CommandError::NotReady);
        }

        let seq_no = self.next_seq();
        let command = Command::init(request, seq_no, self.default_retries)?;

        if !command.pre_states().contains(&self.mode) {
            tracing::debug!(seq_no, mode = ?self.mode, "admission refused");
            return Err(CommandError::NetworkBusy);
        }
        if command.exec_state().is_some() && self.mode_owner.is_some() {
            tracing::debug!(seq_no, "mode-changing command already running");
            return Err(CommandError::NetworkBusy);
        }

        if let Some(exec_state) = command.exec_state() {
            self.mode = exec_state;
            self.mode_owner = Some(seq_no);
            tracing::debug!(seq_no, mode = ?self.mode, "network mode entered");
        }

        let mut runner = CommandRunner::new(command, self.send_timeout);
        let actions = runner.start(now);
        self.runners.insert(seq_no, runner);
        Ok((seq_no, self.absorb(seq_no, actions)))
    }

    /// Route one inbound packet.
    ///
    /// A packet whose envelope sequence number is owned by a runner goes
    /// there and nowhere else. Otherwise, if its body is the report an
    /// in-flight command is waiting for, it is delivered to that runner
    /// (lowest sequence number wins when several qualify). Everything else
    /// is unsolicited.
    pub fn handle_packet(&mut self, packet: Packet, now: Instant) -> Vec<CoordinatorAction> {
        if let Some(runner) = self.runners.get_mut(&packet.seq_number) {
            let actions = runner.handle_packet(&packet, self.mode, now);
            return self.absorb(packet.seq_number, actions);
        }

        if let Some(command) = &packet.command {
            let mut claimants: Vec<u8> = self
                .runners
                .iter()
                .filter(|(_, runner)| runner.command().wants_response(command))
                .map(|(&seq, _)| seq)
                .collect();
            claimants.sort_unstable();

            if let Some(&seq_no) = claimants.first() {
                let actions = self
                    .runners
                    .get_mut(&seq_no)
                    .expect("claimant taken from the runner table")
                    .handle_packet(&packet, self.mode, now);
                return self.absorb(seq_no, actions);
            }
        }

        vec![CoordinatorAction::Unsolicited(packet)]
    }

    /// Advance every runner's deadline.
    pub fn tick(&mut self, now: Instant) -> Vec<CoordinatorAction> {
        let seqs: Vec<u8> = self.runners.keys().copied().collect();
        let mut out = Vec::new();
        for seq_no in seqs {
            if let Some(runner) = self.runners.get_mut(&seq_no) {
                let actions = runner.tick(now);
                out.extend(self.absorb(seq_no, actions));
            }
        }
        out
    }

    /// The caller finished interviewing a freshly included node.
    pub fn configuration_done(&mut self) {
        if self.mode == NetworkMode::ConfiguringNewNode {
            self.mode = NetworkMode::Idle;
            tracing::debug!("new-node configuration finished");
        }
    }

    /// The transport died: fail everything, go `NotReady`.
    pub fn transport_failed(&mut self) -> Vec<CoordinatorAction> {
        tracing::warn!(in_flight = self.runners.len(), "transport closed");
        self.fail_all(CommandError::TransportClosed)
    }

    /// Cooperative shutdown: cancel everything, go `NotReady`.
    pub fn shutdown(&mut self) -> Vec<CoordinatorAction> {
        self.fail_all(CommandError::Cancelled)
    }

    fn fail_all(&mut self, error: CommandError) -> Vec<CoordinatorAction> {
        self.mode = NetworkMode::NotReady;
        self.mode_owner = None;
        let mut out = Vec::new();
        for (seq_no, mut runner) in std::mem::take(&mut self.runners) {
            for action in runner.fail(error.clone()) {
                if let RunnerAction::Complete(result) = action {
                    out.push(CoordinatorAction::CommandComplete { seq_no, result });
                }
            }
        }
        out
    }

    /// Allocate the next free sequence number, wrapping at 256 and
    /// skipping values still owned by runners.
    fn next_seq(&mut self) -> u8 {
        debug_assert!(self.runners.len() < 256, "sequence space exhausted");
        loop {
            let seq = self.seq_counter;
            self.seq_counter = self.seq_counter.wrapping_add(1);
            if !self.runners.contains_key(&seq) {
                return seq;
            }
        }
    }

    /// Translate runner actions, retiring finished runners and applying
    /// completion-driven mode transitions.
    fn absorb(&mut self, seq_no: u8, actions: Vec<RunnerAction>) -> Vec<CoordinatorAction> {
        let mut out = Vec::new();
        for action in actions {
            match action {
                RunnerAction::SendFrame(frame) => {
                    out.push(CoordinatorAction::SendFrame(frame));
                }
                RunnerAction::NotifyQueued => {
                    out.push(CoordinatorAction::CommandQueued { seq_no });
                }
                RunnerAction::Complete(result) => {
                    if let Some(runner) = self.runners.remove(&seq_no) {
                        self.mode_transition_on_complete(seq_no, &runner, &result);
                    }
                    out.push(CoordinatorAction::CommandComplete { seq_no, result });
                }
            }
        }
        out
    }

    fn mode_transition_on_complete(
        &mut self,
        seq_no: u8,
        runner: &CommandRunner,
        result: &CommandResult,
    ) {
        if self.mode_owner != Some(seq_no) {
            return;
        }
        self.mode_owner = None;

        let included = matches!(runner.command().request(), ZWaveCommand::NodeAdd(c) if c.mode != NodeAddMode::Stop)
            && matches!(
                result,
                Ok(CommandOutcome::Report(ZWaveCommand::NodeAddStatus(status)))
                    if status.status == InclusionStatus::Done
            );

        self.mode = if included { NetworkMode::ConfiguringNewNode } else { NetworkMode::Idle };
        tracing::debug!(seq_no, mode = ?self.mode, "network mode left");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use zipgw_proto::command::inclusion::{NodeAdd, NodeAddStatus, NodeRemove, NodeRemoveMode};
    use zipgw_proto::command::proxy::NodeListGet;
    use zipgw_proto::command::switch::BinaryValue;
    use zipgw_proto::envelope::PacketTypes;

    use super::*;

    fn coordinator() -> NetworkCoordinator {
        let config = ZipConfig::new("[fd00::2]:4123".parse().unwrap());
        let mut coordinator = NetworkCoordinator::new(&config, 0x10);
        coordinator.startup_complete();
        coordinator
    }

    fn node_add() -> ZWaveCommand {
        ZWaveCommand::NodeAdd(NodeAdd { seq_no: 0, mode: NodeAddMode::AnyS2, tx_options: 0x20 })
    }

    fn add_status(seq_no: u8, status: InclusionStatus) -> ZWaveCommand {
        ZWaveCommand::NodeAddStatus(NodeAddStatus {
            seq_no,
            status,
            node_id: zipgw_proto::NodeId::new(12).ok(),
            info: None,
            s2: None,
        })
    }

    #[test]
    fn not_ready_refuses_everything() {
        let config = ZipConfig::new("[fd00::2]:4123".parse().unwrap());
        let mut coordinator = NetworkCoordinator::new(&config, 0);
        assert_eq!(
            coordinator.dispatch(ZWaveCommand::BasicGet, Instant::now()).unwrap_err(),
            CommandError::NotReady
        );
    }

    #[test]
    fn sequence_numbers_are_distinct_and_skip_in_flight() {
        let mut coordinator = coordinator();
        let now = Instant::now();

        let mut seqs = Vec::new();
        for _ in 0..8 {
            let (seq, _) =
                coordinator.dispatch(ZWaveCommand::BasicSet(BinaryValue::On), now).unwrap();
            seqs.push(seq);
        }
        let mut deduped = seqs.clone();
        deduped.dedup();
        assert_eq!(seqs, deduped);
        assert_eq!(coordinator.in_flight(), 8);
    }

    #[test]
    fn sequence_allocator_wraps_around_live_commands() {
        let mut coordinator = coordinator();
        coordinator.seq_counter = 0xFF;
        let now = Instant::now();

        let (first, _) =
            coordinator.dispatch(ZWaveCommand::BasicSet(BinaryValue::On), now).unwrap();
        assert_eq!(first, 0xFF);

        coordinator.seq_counter = 0xFF; // collide on purpose
        let (second, _) =
            coordinator.dispatch(ZWaveCommand::BasicSet(BinaryValue::Off), now).unwrap();
        assert_eq!(second, 0x00);
    }

    #[test]
    fn inclusion_gates_other_management() {
        let mut coordinator = coordinator();
        let now = Instant::now();

        coordinator.dispatch(node_add(), now).unwrap();
        assert_eq!(coordinator.mode(), NetworkMode::IncludingNode);

        let exclusion =
            ZWaveCommand::NodeRemove(NodeRemove { seq_no: 0, mode: NodeRemoveMode::Any });
        assert_eq!(
            coordinator.dispatch(exclusion, now).unwrap_err(),
            CommandError::NetworkBusy
        );

        // Ordinary traffic is also out while including.
        assert_eq!(
            coordinator.dispatch(ZWaveCommand::BasicGet, now).unwrap_err(),
            CommandError::NetworkBusy
        );
    }

    #[test]
    fn successful_inclusion_enters_configuring_then_idle() {
        let mut coordinator = coordinator();
        let now = Instant::now();

        let (seq, _) = coordinator.dispatch(node_add(), now).unwrap();

        let status = Packet::request(0xA0, &add_status(seq, InclusionStatus::Done));
        let actions = coordinator.handle_packet(status, now);
        assert!(actions
            .iter()
            .any(|a| matches!(a, CoordinatorAction::CommandComplete { result: Ok(_), .. })));
        assert_eq!(coordinator.mode(), NetworkMode::ConfiguringNewNode);

        // Device traffic is admitted during configuration.
        coordinator.dispatch(ZWaveCommand::BasicGet, now).unwrap();

        coordinator.configuration_done();
        assert_eq!(coordinator.mode(), NetworkMode::Idle);
    }

    #[test]
    fn failed_inclusion_returns_to_idle() {
        let mut coordinator = coordinator();
        let now = Instant::now();

        let (seq, _) = coordinator.dispatch(node_add(), now).unwrap();
        let status = Packet::request(0xA0, &add_status(seq, InclusionStatus::Failed));
        coordinator.handle_packet(status, now);
        assert_eq!(coordinator.mode(), NetworkMode::Idle);
    }

    #[test]
    fn unowned_packets_are_unsolicited() {
        let mut coordinator = coordinator();
        let actions = coordinator.handle_packet(Packet::ack_response(0x42), Instant::now());
        assert!(matches!(actions[..], [CoordinatorAction::Unsolicited(_)]));
    }

    #[test]
    fn report_without_matching_get_is_unsolicited() {
        let mut coordinator = coordinator();
        let now = Instant::now();
        coordinator.dispatch(ZWaveCommand::BasicSet(BinaryValue::On), now).unwrap();

        let push = Packet::request(0xA0, &ZWaveCommand::BasicReport(BinaryValue::On));
        let actions = coordinator.handle_packet(push, now);
        assert!(matches!(actions[..], [CoordinatorAction::Unsolicited(_)]));
    }

    #[test]
    fn report_routes_to_waiting_get() {
        let mut coordinator = coordinator();
        let now = Instant::now();

        let (seq, _) = coordinator
            .dispatch(ZWaveCommand::NodeListGet(NodeListGet { seq_no: 0 }), now)
            .unwrap();

        let report = ZWaveCommand::NodeListReport(zipgw_proto::command::proxy::NodeListReport {
            seq_no: seq,
            status: 0,
            controller_id: 1,
            node_list: vec![],
        });
        let actions = coordinator.handle_packet(Packet::request(0xA0, &report), now);
        assert!(matches!(
            actions[..],
            [CoordinatorAction::CommandComplete { seq_no, result: Ok(_) }] if seq_no == seq
        ));
        assert_eq!(coordinator.in_flight(), 0);
    }

    #[test]
    fn transport_loss_fails_all_and_goes_not_ready() {
        let mut coordinator = coordinator();
        let now = Instant::now();
        coordinator.dispatch(ZWaveCommand::BasicSet(BinaryValue::On), now).unwrap();
        coordinator.dispatch(ZWaveCommand::BasicGet, now).unwrap();

        let actions = coordinator.transport_failed();
        assert_eq!(actions.len(), 2);
        assert!(actions.iter().all(|a| matches!(
            a,
            CoordinatorAction::CommandComplete { result: Err(CommandError::TransportClosed), .. }
        )));
        assert_eq!(coordinator.mode(), NetworkMode::NotReady);
        assert_eq!(coordinator.in_flight(), 0);
    }

    #[test]
    fn queued_command_keeps_its_sequence_number() {
        let mut coordinator = coordinator();
        let now = Instant::now();

        let (seq, _) =
            coordinator.dispatch(ZWaveCommand::BasicSet(BinaryValue::On), now).unwrap();
        let parked = Packet::nack(
            seq,
            PacketTypes::NACK_WAITING,
            Some(Duration::from_secs(600)),
        );
        let actions = coordinator.handle_packet(parked, now);
        assert!(matches!(
            actions[..],
            [CoordinatorAction::CommandQueued { seq_no }] if seq_no == seq
        ));
        assert_eq!(coordinator.in_flight(), 1);

        // A later dispatch must not reuse the parked sequence number.
        coordinator.seq_counter = seq;
        let (next, _) = coordinator.dispatch(ZWaveCommand::BasicGet, now).unwrap();
        assert_ne!(next, seq);
    }
}
