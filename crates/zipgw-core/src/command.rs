//! One in-flight command and its response transitions.
//!
//! A [`Command`] wraps the outbound [`ZWaveCommand`] with the mutable
//! delivery state the protocol tracks per frame: the envelope sequence
//! number and the remaining retries. [`Command::handle_response`] is the
//! uniform acknowledged-command logic; commands that wait for a report
//! recognize it by shape (and, for network management, by the sequence
//! number echoed inside the body).
//!
//! # Transitions
//!
//! ```text
//!                   ┌─────────── ack (no report expected) ──────► Done(Ack)
//!                   │
//! send ──► waiting ─┼─ matching report ─────────────────────────► Done(Report)
//!                   │
//!                   ├─ nack, retries left ──► Retry (resend)
//!                   ├─ nack, retries spent ──────────────────────► Done(NackResponse)
//!                   ├─ nack+waiting, sleeping delay ──► Queued
//!                   └─ anything else ──► Continue (keep waiting)
//! ```

use zipgw_proto::command::inclusion::{NodeAddMode, NodeRemoveMode};
use zipgw_proto::command::management::LearnMode;
use zipgw_proto::command::switch::SwitchLevel;
use zipgw_proto::envelope::PacketTypes;
use zipgw_proto::{Packet, ZWaveCommand};

use crate::coordinator::NetworkMode;
use crate::error::{CommandError, CommandOutcome, CommandResult};

/// Modes ordinary device traffic may run in.
const DEVICE_MODES: &[NetworkMode] = &[NetworkMode::Idle, NetworkMode::ConfiguringNewNode];

/// What [`Command::handle_response`] tells the runner to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Not for us, or not conclusive; keep waiting
    Continue,
    /// Refused but retries remain; send again
    Retry,
    /// Parked in the gateway mailbox for a sleeping node
    Queued,
    /// Terminal, with the result for the caller
    Done(CommandResult),
}

/// An admitted command with its delivery state.
#[derive(Debug, Clone)]
pub struct Command {
    request: ZWaveCommand,
    seq_number: u8,
    retries: u8,
}

impl Command {
    /// Validate the request, stamp the sequence number and build the
    /// delivery state.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::InvalidParam`] for out-of-range parameters.
    /// Node ids are already proven by [`zipgw_proto::NodeId`]; everything
    /// that type cannot express is checked here, before any send.
    pub fn init(
        mut request: ZWaveCommand,
        seq_number: u8,
        retries: u8,
    ) -> Result<Self, CommandError> {
        validate(&request)?;
        request.set_seq_no(seq_number);
        Ok(Self { request, seq_number, retries })
    }

    /// The envelope sequence number this command owns.
    #[must_use]
    pub fn seq_number(&self) -> u8 {
        self.seq_number
    }

    /// Retries remaining.
    #[must_use]
    pub fn retries(&self) -> u8 {
        self.retries
    }

    /// The outbound request.
    #[must_use]
    pub fn request(&self) -> &ZWaveCommand {
        &self.request
    }

    /// Encode the full outbound datagram (envelope plus body).
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        Packet::request(self.seq_number, &self.request).to_bytes()
    }

    /// Consume one retry if any remain. The runner calls this on timeout,
    /// which counts against the same budget as an explicit nack.
    pub(crate) fn take_retry(&mut self) -> bool {
        if self.retries > 0 {
            self.retries -= 1;
            true
        } else {
            false
        }
    }

    /// Network modes this command may start in.
    #[must_use]
    pub fn pre_states(&self) -> &'static [NetworkMode] {
        match &self.request {
            ZWaveCommand::NodeAdd(c) => match c.mode {
                NodeAddMode::Stop => &[NetworkMode::IncludingNode],
                _ => &[NetworkMode::Idle],
            },
            ZWaveCommand::NodeRemove(c) => match c.mode {
                NodeRemoveMode::Stop => &[NetworkMode::ExcludingNode],
                NodeRemoveMode::Any => &[NetworkMode::Idle],
            },
            // Key exchange happens while the inclusion is running.
            ZWaveCommand::NodeAddKeysSet(_) | ZWaveCommand::NodeAddDskSet(_) => {
                &[NetworkMode::IncludingNode]
            }
            ZWaveCommand::LearnModeSet(c) => match c.mode {
                LearnMode::Disable => &[NetworkMode::LearnMode],
                _ => &[NetworkMode::Idle],
            },
            ZWaveCommand::DefaultSet(_) => &[NetworkMode::Idle],
            _ => DEVICE_MODES,
        }
    }

    /// The mode the network enters while this command runs, for the
    /// commands that change it.
    #[must_use]
    pub fn exec_state(&self) -> Option<NetworkMode> {
        match &self.request {
            ZWaveCommand::NodeAdd(c) if c.mode != NodeAddMode::Stop => {
                Some(NetworkMode::IncludingNode)
            }
            ZWaveCommand::NodeRemove(c) if c.mode == NodeRemoveMode::Any => {
                Some(NetworkMode::ExcludingNode)
            }
            ZWaveCommand::LearnModeSet(c) if c.mode != LearnMode::Disable => {
                Some(NetworkMode::LearnMode)
            }
            ZWaveCommand::DefaultSet(_) => Some(NetworkMode::DefaultSetting),
            _ => None,
        }
    }

    /// Whether this command completes on a report rather than a plain ack.
    #[must_use]
    pub fn expects_report(&self) -> bool {
        use ZWaveCommand as C;
        match &self.request {
            C::NodeAdd(c) => c.mode != NodeAddMode::Stop,
            C::NodeRemove(c) => c.mode == NodeRemoveMode::Any,
            C::LearnModeSet(c) => c.mode != LearnMode::Disable,
            C::NodeNeighborUpdateRequest(_)
            | C::DefaultSet(_)
            | C::NodeListGet(_)
            | C::NodeInfoCachedGet(_)
            | C::BasicGet
            | C::SwitchBinaryGet
            | C::SwitchMultilevelGet
            | C::SensorMultilevelGet(_)
            | C::MeterGet(_)
            | C::BatteryGet
            | C::ThermostatModeGet
            | C::ThermostatSetpointGet(_)
            | C::ThermostatFanModeGet
            | C::ThermostatFanStateGet
            | C::ThermostatSetbackGet
            | C::DoorLockOperationGet
            | C::UserCodeGet { .. }
            | C::UsersNumberGet
            | C::ConfigurationGet { .. }
            | C::ConfigurationBulkGet { .. }
            | C::ManufacturerSpecificGet
            | C::DeviceSpecificGet { .. }
            | C::VersionCommandClassGet { .. }
            | C::FirmwareMdGet
            | C::MailboxConfigurationGet
            | C::WakeUpIntervalGet
            | C::WakeUpIntervalCapabilitiesGet
            | C::AssociationGet { .. } => true,
            _ => false,
        }
    }

    /// Whether `response` is the report this command is waiting for.
    ///
    /// Network-management replies echo the request's sequence number inside
    /// the body; device reports are matched by shape and key parameters
    /// (sensor type, setpoint type, parameter number, user slot, group).
    #[must_use]
    pub fn wants_response(&self, response: &ZWaveCommand) -> bool {
        use ZWaveCommand as C;
        if !self.expects_report() {
            return false;
        }
        match (&self.request, response) {
            (C::NodeAdd(_), C::NodeAddStatus(s)) => s.seq_no == self.seq_number,
            (C::NodeRemove(_), C::NodeRemoveStatus(s)) => s.seq_no == self.seq_number,
            (C::NodeNeighborUpdateRequest(_), C::NodeNeighborUpdateStatus(s)) => {
                s.seq_no == self.seq_number
            }
            (C::LearnModeSet(_), C::LearnModeSetStatus(s)) => s.seq_no == self.seq_number,
            (C::DefaultSet(_), C::DefaultSetComplete(s)) => s.seq_no == self.seq_number,
            (C::NodeListGet(_), C::NodeListReport(r)) => r.seq_no == self.seq_number,
            (C::NodeInfoCachedGet(_), C::NodeInfoCacheReport(r)) => r.seq_no == self.seq_number,

            (C::BasicGet, C::BasicReport(_)) => true,
            (C::SwitchBinaryGet, C::SwitchBinaryReport(_)) => true,
            (C::SwitchMultilevelGet, C::SwitchMultilevelReport(_)) => true,
            (C::SensorMultilevelGet(get), C::SensorMultilevelReport(r)) => {
                r.sensor_type == get.sensor_type
            }
            (C::MeterGet(_), C::MeterReport(_)) => true,
            (C::BatteryGet, C::BatteryReport(_)) => true,
            (C::ThermostatModeGet, C::ThermostatModeReport(_)) => true,
            (C::ThermostatSetpointGet(kind), C::ThermostatSetpointReport(r)) => {
                r.setpoint_type == *kind
            }
            (C::ThermostatFanModeGet, C::ThermostatFanModeReport(_)) => true,
            (C::ThermostatFanStateGet, C::ThermostatFanStateReport(_)) => true,
            (C::ThermostatSetbackGet, C::ThermostatSetbackReport(_)) => true,
            (C::DoorLockOperationGet, C::DoorLockOperationReport(_)) => true,
            (C::UserCodeGet { user_id }, C::UserCodeReport(r)) => r.user_id == *user_id,
            (C::UsersNumberGet, C::UsersNumberReport { .. }) => true,
            (C::ConfigurationGet { parameter }, C::ConfigurationReport(r)) => {
                r.parameter == *parameter
            }
            (C::ConfigurationBulkGet { parameter_offset, .. }, C::ConfigurationBulkReport(r)) => {
                r.parameter_offset == *parameter_offset
            }
            (C::ManufacturerSpecificGet, C::ManufacturerSpecificReport(_)) => true,
            (C::DeviceSpecificGet { .. }, C::DeviceSpecificReport(_)) => true,
            (C::VersionCommandClassGet { class }, C::VersionCommandClassReport { class: c, .. }) => {
                c == class
            }
            (C::FirmwareMdGet, C::FirmwareMdReport(_)) => true,
            (C::MailboxConfigurationGet, C::MailboxConfigurationReport(_)) => true,
            (C::WakeUpIntervalGet, C::WakeUpIntervalReport(_)) => true,
            (C::WakeUpIntervalCapabilitiesGet, C::WakeUpIntervalCapabilitiesReport(_)) => true,
            (C::AssociationGet { group }, C::AssociationReport(r)) => r.group == *group,
            _ => false,
        }
    }

    /// Apply one inbound packet.
    ///
    /// The coordinator's current `mode` decides the sleeping-node case: a
    /// nack-waiting during new-node configuration is the gateway stalling
    /// the interview, not a mailbox park, so the command keeps waiting.
    pub fn handle_response(&mut self, packet: &Packet, mode: NetworkMode) -> Transition {
        if let Some(response) = &packet.command {
            if self.wants_response(response) {
                return Transition::Done(Ok(CommandOutcome::Report(response.clone())));
            }
        }

        if packet.seq_number != self.seq_number {
            return Transition::Continue;
        }

        let types = packet.types;
        if types.contains(PacketTypes::ACK_RESPONSE) {
            if self.expects_report() {
                Transition::Continue
            } else {
                Transition::Done(Ok(CommandOutcome::Ack))
            }
        } else if types.contains(PacketTypes::NACK_WAITING) {
            if packet.sleeping_delay() && mode != NetworkMode::ConfiguringNewNode {
                Transition::Queued
            } else {
                Transition::Continue
            }
        } else if types.contains(PacketTypes::NACK_RESPONSE) {
            if self.take_retry() {
                Transition::Retry
            } else {
                Transition::Done(Err(CommandError::NackResponse))
            }
        } else {
            Transition::Continue
        }
    }
}

fn invalid(reason: impl Into<String>) -> CommandError {
    CommandError::InvalidParam { reason: reason.into() }
}

fn validate(request: &ZWaveCommand) -> Result<(), CommandError> {
    match request {
        ZWaveCommand::SwitchMultilevelSet(SwitchLevel::Level(level)) => {
            if *level == 0 || *level > 99 {
                return Err(invalid(format!("dimmer level {level} outside 1..=99")));
            }
        }
        ZWaveCommand::SwitchMultilevelSet(SwitchLevel::Unknown(byte)) => {
            return Err(invalid(format!("dimmer value {byte:#04x} is not settable")));
        }
        ZWaveCommand::NodeAddDskSet(c) => {
            if c.input.len() > 15 {
                return Err(invalid(format!("dsk input of {} bytes exceeds 15", c.input.len())));
            }
        }
        ZWaveCommand::UserCodeSet(c) => {
            if !(4..=10).contains(&c.code.len()) {
                return Err(invalid(format!("user code of {} digits outside 4..=10", c.code.len())));
            }
        }
        ZWaveCommand::ConfigurationSet(c) => {
            validate_config_width(c.size, c.value)?;
        }
        ZWaveCommand::WakeUpIntervalSet(c) => {
            if c.seconds > 0x00FF_FFFF {
                return Err(invalid(format!("wake-up interval {}s exceeds 24 bits", c.seconds)));
            }
        }
        ZWaveCommand::AssociationSet(c) => {
            if c.nodes.is_empty() {
                return Err(invalid("association set requires at least one node"));
            }
        }
        _ => {}
    }
    Ok(())
}

fn validate_config_width(size: u8, value: i64) -> Result<(), CommandError> {
    let fits = match size {
        1 => i8::try_from(value).is_ok(),
        2 => i16::try_from(value).is_ok(),
        4 => i32::try_from(value).is_ok(),
        other => return Err(invalid(format!("configuration size {other} not in {{1, 2, 4}}"))),
    };
    if fits {
        Ok(())
    } else {
        Err(invalid(format!("configuration value {value} does not fit in {size} bytes")))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use zipgw_proto::command::proxy::{NodeListGet, NodeListReport};
    use zipgw_proto::command::switch::BinaryValue;
    use zipgw_proto::nodes::NodeId;

    use super::*;

    fn ack_command(seq: u8, retries: u8) -> Command {
        Command::init(ZWaveCommand::BasicSet(BinaryValue::On), seq, retries).unwrap()
    }

    #[test]
    fn ack_completes_plain_command() {
        let mut command = ack_command(5, 2);
        let transition = command.handle_response(&Packet::ack_response(5), NetworkMode::Idle);
        assert_eq!(transition, Transition::Done(Ok(CommandOutcome::Ack)));
    }

    #[test]
    fn foreign_seq_is_ignored() {
        let mut command = ack_command(5, 2);
        let transition = command.handle_response(&Packet::ack_response(6), NetworkMode::Idle);
        assert_eq!(transition, Transition::Continue);
    }

    #[test]
    fn nack_retries_then_fails() {
        let mut command = ack_command(5, 2);
        let nack = Packet::nack(5, PacketTypes::empty(), None);

        assert_eq!(command.handle_response(&nack, NetworkMode::Idle), Transition::Retry);
        assert_eq!(command.retries(), 1);
        assert_eq!(command.handle_response(&nack, NetworkMode::Idle), Transition::Retry);
        assert_eq!(command.retries(), 0);
        assert_eq!(
            command.handle_response(&nack, NetworkMode::Idle),
            Transition::Done(Err(CommandError::NackResponse))
        );
    }

    #[test]
    fn sleeping_nack_queues_outside_configuration() {
        let mut command = ack_command(5, 2);
        let parked = Packet::nack(
            5,
            PacketTypes::NACK_WAITING,
            Some(Duration::from_secs(300)),
        );

        assert_eq!(command.handle_response(&parked, NetworkMode::Idle), Transition::Queued);
    }

    #[test]
    fn sleeping_nack_continues_during_configuration() {
        let mut command = ack_command(5, 2);
        let parked = Packet::nack(
            5,
            PacketTypes::NACK_WAITING,
            Some(Duration::from_secs(300)),
        );

        assert_eq!(
            command.handle_response(&parked, NetworkMode::ConfiguringNewNode),
            Transition::Continue
        );
    }

    #[test]
    fn get_waits_through_ack_then_takes_report() {
        let request = ZWaveCommand::NodeListGet(NodeListGet { seq_no: 0 });
        let mut command = Command::init(request, 9, 2).unwrap();

        assert_eq!(
            command.handle_response(&Packet::ack_response(9), NetworkMode::Idle),
            Transition::Continue
        );

        let report = ZWaveCommand::NodeListReport(NodeListReport {
            seq_no: 9,
            status: 0,
            controller_id: 1,
            node_list: vec![NodeId::new(1).unwrap()],
        });
        // Reports arrive under the gateway's own envelope seq.
        let push = Packet::request(0xA0, &report);
        let Transition::Done(Ok(CommandOutcome::Report(got))) =
            command.handle_response(&push, NetworkMode::Idle)
        else {
            panic!("expected report completion");
        };
        assert_eq!(got, report);
    }

    #[test]
    fn report_with_wrong_body_seq_is_ignored() {
        let request = ZWaveCommand::NodeListGet(NodeListGet { seq_no: 0 });
        let mut command = Command::init(request, 9, 2).unwrap();

        let report = ZWaveCommand::NodeListReport(NodeListReport {
            seq_no: 8,
            status: 0,
            controller_id: 1,
            node_list: vec![],
        });
        assert_eq!(
            command.handle_response(&Packet::request(0xA0, &report), NetworkMode::Idle),
            Transition::Continue
        );
    }

    #[test]
    fn init_rejects_out_of_range_level() {
        let request = ZWaveCommand::SwitchMultilevelSet(SwitchLevel::Level(100));
        assert!(matches!(
            Command::init(request, 1, 2),
            Err(CommandError::InvalidParam { .. })
        ));
    }

    #[test]
    fn init_rejects_wide_config_value() {
        let request = ZWaveCommand::ConfigurationSet(
            zipgw_proto::command::configuration::ConfigurationValue {
                parameter: 1,
                size: 1,
                value: 300,
            },
        );
        assert!(matches!(
            Command::init(request, 1, 2),
            Err(CommandError::InvalidParam { .. })
        ));
    }

    #[test]
    fn init_stamps_body_seq() {
        let request = ZWaveCommand::NodeListGet(NodeListGet { seq_no: 0 });
        let command = Command::init(request, 0x77, 2).unwrap();
        assert_eq!(command.request().seq_no(), Some(0x77));
    }
}
