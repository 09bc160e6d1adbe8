//! The command error taxonomy.
//!
//! Every failure a caller can see funnels into [`CommandError`]. Decode
//! errors never appear here: malformed unsolicited traffic is logged and
//! dropped, and a malformed frame aimed at an in-flight command leaves the
//! command waiting.

use thiserror::Error;
use zipgw_proto::ZWaveCommand;

/// Terminal failures of a command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The gateway refused the frame after every retry
    #[error("peer refused the frame after all retries")]
    NackResponse,

    /// No response arrived within the send timeout, after every retry
    #[error("no response within the send timeout")]
    Timeout,

    /// Admission was refused: the network is in the wrong mode or another
    /// management operation is running
    #[error("network busy")]
    NetworkBusy,

    /// The coordinator has not started or lost its transport
    #[error("coordinator not ready")]
    NotReady,

    /// The socket failed; fatal to every in-flight command
    #[error("transport closed")]
    TransportClosed,

    /// The coordinator abandoned the command (shutdown or operator cancel)
    #[error("command cancelled")]
    Cancelled,

    /// The command's parameters were rejected before anything was sent
    #[error("invalid parameter: {reason}")]
    InvalidParam {
        /// What was wrong
        reason: String,
    },

    /// A completed command carried a response the caller did not expect
    #[error("unexpected response")]
    UnexpectedResponse,
}

impl CommandError {
    /// True if retrying the whole command later may succeed.
    ///
    /// Parameter errors and cancellations are never transient; mode and
    /// delivery failures usually are.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CommandError::NackResponse
                | CommandError::Timeout
                | CommandError::NetworkBusy
                | CommandError::NotReady
        )
    }
}

/// Successful command outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Frame acknowledged; nothing further expected
    Ack,
    /// The report the command was waiting for
    Report(ZWaveCommand),
    /// Parked in the gateway mailbox for a sleeping node; the final result
    /// is published as an event when delivery happens
    Queued {
        /// Sequence number correlating the eventual
        /// `QueuedCommandResult` event with this call
        seq_no: u8,
    },
}

/// What a finished command resolves to.
pub type CommandResult = Result<CommandOutcome, CommandError>;
