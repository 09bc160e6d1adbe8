//! Z/IP gateway client core.
//!
//! This crate drives the protocol that `zipgw-proto` encodes: per-command
//! send/ack/retry state machines, the process-wide network coordinator, and
//! a thin async client that connects them to a UDP transport.
//!
//! # Architecture
//!
//! Protocol logic is strictly separated from I/O:
//!
//! ```text
//!      ┌───────────────────────────────┐
//!      │ pure state machines           │
//!      │ - Command (ack/retry/queue)   │
//!      │ - CommandRunner (timeouts)    │
//!      │ - NetworkCoordinator (modes)  │
//!      └───────────────────────────────┘
//!         ↓ actions            ↑ packets, time
//! ┌─────────────────────────────────────┐
//! │ ZipClient driver (tokio)            │
//! │ - UdpTransport / test transports    │
//! │ - timers via Environment            │
//! └─────────────────────────────────────┘
//! ```
//!
//! State machines never touch the clock or the socket: time arrives as a
//! parameter, effects leave as action values the driver executes. The same
//! machines run unchanged under the deterministic harness.
//!
//! # Modules
//!
//! - [`command`]: one in-flight command and its response transitions
//! - [`runner`]: the per-command send/ack/retry/queue cycle
//! - [`coordinator`]: modes, sequence numbers, packet routing, admission
//! - [`transport`]: datagram transport trait and the UDP implementation
//! - [`client`]: the caller-facing async facade
//! - [`config`]: coordinator startup options
//! - [`env`]: time/entropy injection seam
//! - [`error`]: the command error taxonomy

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod command;
pub mod config;
pub mod coordinator;
pub mod env;
pub mod error;
pub mod runner;
pub mod transport;

pub use client::{ClientEvent, ZipClient};
pub use command::{Command, Transition};
pub use config::ZipConfig;
pub use coordinator::{CoordinatorAction, NetworkCoordinator, NetworkMode};
pub use error::{CommandError, CommandOutcome, CommandResult};
pub use runner::{CommandRunner, RunnerAction};
pub use transport::{Transport, UdpTransport};
