//! The per-command runner: drives one command's send/ack/retry/queue cycle.
//!
//! This is a pure state machine in the action style: methods take the
//! current time, mutate internal state, and return [`RunnerAction`]s for
//! the driver to execute. It owns the per-send deadline; a timeout spends
//! a retry exactly as an explicit nack does, so a command created with
//! `retries = n` never issues more than `n + 1` sends.

use std::time::{Duration, Instant};

use bytes::Bytes;
use zipgw_proto::Packet;

use crate::command::{Command, Transition};
use crate::coordinator::NetworkMode;
use crate::error::{CommandError, CommandResult};

/// Effects the driver executes on the runner's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunnerAction {
    /// Send this datagram to the gateway
    SendFrame(Bytes),
    /// The command was parked for a sleeping node; tell the caller
    NotifyQueued,
    /// The command is finished; deliver the result and free the sequence
    /// number
    Complete(CommandResult),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunnerState {
    /// A send is outstanding, deadline armed
    Waiting,
    /// Parked in the gateway mailbox; no deadline runs
    Queued,
    /// Result delivered
    Finished,
}

/// Drives one in-flight command.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    command: Command,
    state: RunnerState,
    send_timeout: Duration,
    deadline: Option<Instant>,
    sends_issued: u32,
}

impl CommandRunner {
    /// Wrap an admitted command. Nothing is sent until [`CommandRunner::start`].
    #[must_use]
    pub fn new(command: Command, send_timeout: Duration) -> Self {
        Self {
            command,
            state: RunnerState::Waiting,
            send_timeout,
            deadline: None,
            sends_issued: 0,
        }
    }

    /// The sequence number this runner owns.
    #[must_use]
    pub fn seq_number(&self) -> u8 {
        self.command.seq_number()
    }

    /// The command being driven.
    #[must_use]
    pub fn command(&self) -> &Command {
        &self.command
    }

    /// True once a result has been delivered.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state == RunnerState::Finished
    }

    /// True while parked in the gateway mailbox.
    #[must_use]
    pub fn is_queued(&self) -> bool {
        self.state == RunnerState::Queued
    }

    /// Total frames sent so far (first send plus retries).
    #[must_use]
    pub fn sends_issued(&self) -> u32 {
        self.sends_issued
    }

    /// Issue the first send and arm the deadline.
    pub fn start(&mut self, now: Instant) -> Vec<RunnerAction> {
        vec![self.send_frame(now)]
    }

    /// Apply one inbound packet routed to this runner.
    ///
    /// Packets still reach a queued runner: the gateway releases the
    /// mailbox on wake-up and answers under the original sequence number,
    /// which is what completes the command.
    pub fn handle_packet(
        &mut self,
        packet: &Packet,
        mode: NetworkMode,
        now: Instant,
    ) -> Vec<RunnerAction> {
        if self.state == RunnerState::Finished {
            return Vec::new();
        }

        match self.command.handle_response(packet, mode) {
            Transition::Continue => Vec::new(),
            Transition::Retry => vec![self.send_frame(now)],
            Transition::Queued => {
                self.state = RunnerState::Queued;
                self.deadline = None;
                vec![RunnerAction::NotifyQueued]
            }
            Transition::Done(result) => self.finish(result),
        }
    }

    /// Check the deadline. A lapsed deadline counts as a nack: retry if the
    /// budget allows, otherwise fail with [`CommandError::Timeout`].
    pub fn tick(&mut self, now: Instant) -> Vec<RunnerAction> {
        if self.state != RunnerState::Waiting {
            return Vec::new();
        }
        match self.deadline {
            Some(deadline) if now >= deadline => {
                if self.command.take_retry() {
                    vec![self.send_frame(now)]
                } else {
                    self.finish(Err(CommandError::Timeout))
                }
            }
            _ => Vec::new(),
        }
    }

    /// Cooperative cancellation: no further sends, terminal result now.
    pub fn cancel(&mut self) -> Vec<RunnerAction> {
        if self.state == RunnerState::Finished {
            return Vec::new();
        }
        self.finish(Err(CommandError::Cancelled))
    }

    /// Fail without further sends (transport loss).
    pub fn fail(&mut self, error: CommandError) -> Vec<RunnerAction> {
        if self.state == RunnerState::Finished {
            return Vec::new();
        }
        self.finish(Err(error))
    }

    fn send_frame(&mut self, now: Instant) -> RunnerAction {
        self.sends_issued += 1;
        self.deadline = Some(now + self.send_timeout);
        self.state = RunnerState::Waiting;
        RunnerAction::SendFrame(Bytes::from(self.command.encode()))
    }

    fn finish(&mut self, result: CommandResult) -> Vec<RunnerAction> {
        self.state = RunnerState::Finished;
        self.deadline = None;
        vec![RunnerAction::Complete(result)]
    }
}

#[cfg(test)]
mod tests {
    use zipgw_proto::command::switch::BinaryValue;
    use zipgw_proto::envelope::PacketTypes;
    use zipgw_proto::ZWaveCommand;

    use super::*;
    use crate::error::CommandOutcome;

    const TIMEOUT: Duration = Duration::from_secs(2);

    fn runner(retries: u8) -> CommandRunner {
        let command =
            Command::init(ZWaveCommand::BasicSet(BinaryValue::On), 0x10, retries).unwrap();
        CommandRunner::new(command, TIMEOUT)
    }

    #[test]
    fn start_sends_once() {
        let t0 = Instant::now();
        let mut runner = runner(2);
        let actions = runner.start(t0);
        assert_eq!(actions.len(), 1);
        assert!(matches!(actions[0], RunnerAction::SendFrame(_)));
        assert_eq!(runner.sends_issued(), 1);
    }

    #[test]
    fn three_nacks_exhaust_two_retries() {
        let t0 = Instant::now();
        let mut runner = runner(2);
        runner.start(t0);

        let nack = Packet::nack(0x10, PacketTypes::empty(), None);

        let first = runner.handle_packet(&nack, NetworkMode::Idle, t0);
        assert!(matches!(first[..], [RunnerAction::SendFrame(_)]));

        let second = runner.handle_packet(&nack, NetworkMode::Idle, t0);
        assert!(matches!(second[..], [RunnerAction::SendFrame(_)]));

        let third = runner.handle_packet(&nack, NetworkMode::Idle, t0);
        assert_eq!(third, vec![RunnerAction::Complete(Err(CommandError::NackResponse))]);

        assert_eq!(runner.sends_issued(), 3);
        assert!(runner.is_finished());
    }

    #[test]
    fn timeout_spends_the_same_retry_budget() {
        let t0 = Instant::now();
        let mut runner = runner(1);
        runner.start(t0);

        // Before the deadline nothing happens.
        assert!(runner.tick(t0 + Duration::from_millis(100)).is_empty());

        let after_first = runner.tick(t0 + TIMEOUT);
        assert!(matches!(after_first[..], [RunnerAction::SendFrame(_)]));

        let after_second = runner.tick(t0 + TIMEOUT + TIMEOUT);
        assert_eq!(after_second, vec![RunnerAction::Complete(Err(CommandError::Timeout))]);
        assert_eq!(runner.sends_issued(), 2);
    }

    #[test]
    fn queued_runner_stops_timing_out() {
        let t0 = Instant::now();
        let mut runner = runner(2);
        runner.start(t0);

        let parked = Packet::nack(
            0x10,
            PacketTypes::NACK_WAITING,
            Some(Duration::from_secs(600)),
        );
        let actions = runner.handle_packet(&parked, NetworkMode::Idle, t0);
        assert_eq!(actions, vec![RunnerAction::NotifyQueued]);
        assert!(runner.is_queued());

        // Deadline is disarmed while parked.
        assert!(runner.tick(t0 + Duration::from_secs(3600)).is_empty());

        // Wake-up delivery completes under the original seq.
        let done = runner.handle_packet(&Packet::ack_response(0x10), NetworkMode::Idle, t0);
        assert_eq!(done, vec![RunnerAction::Complete(Ok(CommandOutcome::Ack))]);
    }

    #[test]
    fn cancel_is_terminal_and_quiet() {
        let t0 = Instant::now();
        let mut runner = runner(2);
        runner.start(t0);

        assert_eq!(
            runner.cancel(),
            vec![RunnerAction::Complete(Err(CommandError::Cancelled))]
        );
        assert!(runner.cancel().is_empty());
        assert!(runner.tick(t0 + TIMEOUT).is_empty());
        assert_eq!(runner.sends_issued(), 1);
    }
}
