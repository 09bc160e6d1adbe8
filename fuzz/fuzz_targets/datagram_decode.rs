//! Negative-space fuzzer: arbitrary bytes through the datagram decoder.
//!
//! The decoder must be total - any input either parses or returns a
//! structured error. A panic anywhere in the envelope, extension or body
//! path is a bug.

#![no_main]

use libfuzzer_sys::fuzz_target;
use zipgw_proto::{Datagram, ZWaveCommand};

fuzz_target!(|data: &[u8]| {
    // Full datagram path: envelope + extensions + body.
    if let Ok(Datagram::Command(packet)) = Datagram::decode(data) {
        // Whatever decoded must re-encode without panicking, and the
        // re-encoded frame must decode again.
        let wire = packet.to_bytes();
        let _ = Datagram::decode(&wire).expect("re-encoded datagram must decode");
    }

    // Bare body path, as used when bodies arrive through other channels.
    if let Ok(command) = ZWaveCommand::decode(data) {
        let _ = command.to_bytes();
    }
});
