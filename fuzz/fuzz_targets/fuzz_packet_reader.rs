#![no_main]

use libfuzzer_sys::fuzz_target;
use pgp_framing::{FramingConfig, PacketReader};

fuzz_target!(|data: &[u8]| {
    // Fuzz stream decoding - test for panics, crashes, infinite loops
    let config = FramingConfig::default_with_overrides(|c| c.max_body_length = 1 << 20);
    for packet in PacketReader::with_config(data, config).flatten() {
        let _ = packet.to_bytes();
    }
});
