//! Wire codec for the Z/IP (Z-Wave over IP) gateway protocol.
//!
//! This crate contains the pure byte-level layer: it knows how to take a UDP
//! datagram apart into a Z/IP packet envelope plus a decoded Z-Wave command,
//! and how to build the reverse. It holds no protocol state - retries, modes
//! and sequencing live in `zipgw-core`.
//!
//! # Layers
//!
//! ```text
//! datagram
//!   └─ Z/IP envelope (command class 0x23)     [envelope]
//!        ├─ seq number + ack/nack flag bits
//!        ├─ header extensions (expected delay)
//!        └─ Z-Wave command body               [command]
//!             └─ (command_class, command, fields...)
//! ```
//!
//! # Open dispatch
//!
//! The body parser dispatches on the `(command_class, command)` byte pair.
//! Pairs without a dedicated decoder fall back to [`command::RawCommand`],
//! which carries the registry symbols and the untouched payload - decoding is
//! total and never fails on an unknown command. Adding support for a new
//! command class means adding a module under [`command`] and two match arms;
//! nothing else changes.
//!
//! # Modules
//!
//! - [`envelope`]: the fixed Z/IP prefix, flag bits, header extensions
//! - [`packet`]: envelope + body holder, datagram encode/decode
//! - [`command`]: per-command-class body codecs and the [`command::ZWaveCommand`] enum
//! - [`registry`]: byte ↔ symbol tables (command classes, device classes, keys)
//! - [`dsk`]: the 16-byte device-specific key and its dashed-decimal text form
//! - [`nodes`]: node ids and the 29-byte node-list bitmask
//! - [`values`]: precision/scale/size scaled integers shared by sensor-style reports

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod command;
pub mod dsk;
pub mod envelope;
pub mod errors;
pub mod nodes;
pub mod packet;
pub mod registry;
pub mod values;

pub use command::ZWaveCommand;
pub use dsk::Dsk;
pub use envelope::PacketTypes;
pub use errors::{DecodeError, Result};
pub use nodes::NodeId;
pub use packet::{Datagram, KeepAlive, Packet};
pub use registry::{CommandClass, CommandId};
