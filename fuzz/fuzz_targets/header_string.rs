#![no_main]

use dissect_wire::ByteCursor;
use libfuzzer_sys::fuzz_target;

// Fuzz target: length-prefixed string readers.
//
// Catches bugs in:
// - Length prefixes larger than the remaining input
// - Missing or wrong separator after a header string
// - Offset accounting after a short read
fuzz_target!(|data: &[u8]| {
    let mut cursor = ByteCursor::new(data);
    while cursor.read_header_string().is_ok() {}

    let mut cursor = ByteCursor::new(data);
    while cursor.read_string().is_ok() {}
    assert!(cursor.offset() <= data.len());
});
