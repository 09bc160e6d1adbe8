//! Deterministic simulation harness for the Z/IP client.
//!
//! This crate provides the test-side implementations of the core's seams:
//! a seeded [`SimEnv`] for the `Environment` trait, a [`ScriptedTransport`]
//! that answers sends from a closure, a [`TurmoilUdpTransport`] for
//! simulated-network tests, and frame builders in [`gateway`] for playing
//! the gateway's side of the protocol.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod gateway;
pub mod sim_env;
pub mod sim_transport;

pub use sim_env::SimEnv;
pub use sim_transport::{ScriptedTransport, TurmoilUdpTransport};
