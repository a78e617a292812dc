#![no_main]

use dissect_decoder::{DissectDecoder, HexComparison};
use libfuzzer_sys::fuzz_target;

// Fuzz target: decode starting from the decompressed stream.
//
// Skips zstd so the fuzzer spends its time on the magic, the header
// key/value loop and the identity record scan.
fuzz_target!(|data: &[u8]| {
    let _ = DissectDecoder::default().decode_decompressed(data, &mut HexComparison::new());
});
