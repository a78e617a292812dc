#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: full decode of an arbitrary (compressed) file.
//
// Catches bugs in:
// - zstd magic detection and frame iteration
// - Trailing non-zstd data after the last frame
// - Every error path downstream of decompression
fuzz_target!(|data: &[u8]| {
    let _ = dissect_decoder::DissectDecoder::default().decode_bytes(data);
});
