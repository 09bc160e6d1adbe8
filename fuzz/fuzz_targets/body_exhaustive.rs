//! Exhaustive positive-space fuzzer for command bodies.
//!
//! Unlike random fuzzing (datagram_decode.rs), this target walks every
//! `(command_class, command)` pair with fuzzer-chosen payloads, so each
//! family decoder sees both its happy path and its length edges. For
//! bodies that decode, the round trip `decode(encode(x))` must be
//! identity.

#![no_main]

use libfuzzer_sys::fuzz_target;
use zipgw_proto::ZWaveCommand;

// Command bytes that exist somewhere in the dispatch table, plus a few
// that exist nowhere.
const COMMANDS: &[u8] = &[
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x11, 0x12,
    0x13, 0x14, 0x42, 0xFF,
];

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }
    let payload = &data[1..];

    for cc in 0..=u8::MAX {
        let cmd = COMMANDS[data[0] as usize % COMMANDS.len()];

        let mut body = Vec::with_capacity(2 + payload.len());
        body.push(cc);
        body.push(cmd);
        body.extend_from_slice(payload);

        // INVARIANT 1: decoding terminates with a value or a structured
        // error - never a panic.
        let Ok(decoded) = ZWaveCommand::decode(&body) else {
            continue;
        };

        // INVARIANT 2: whatever decoded encodes again without panicking.
        let wire = decoded.to_bytes();

        // INVARIANT 3: the re-encoded body decodes to the same value.
        let again = ZWaveCommand::decode(&wire).expect("re-encoded body must decode");
        assert_eq!(again, decoded, "decode(encode(x)) != x for class {cc:#04x} cmd {cmd:#04x}");
    }
});
