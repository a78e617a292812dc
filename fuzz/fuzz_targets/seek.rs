#![no_main]

use arbitrary::Arbitrary;
use dissect_wire::{ByteCursor, Pattern};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    needle: Vec<u8>,
    haystack: Vec<u8>,
}

// Fuzz target: incremental pattern search against a naive window scan.
//
// The cursor must stop right after the first occurrence, or report
// PatternNotFound when there is none.
fuzz_target!(|input: Input| {
    if input.needle.is_empty() {
        return;
    }
    let pattern = Pattern::new(&input.needle);
    let expected = input
        .haystack
        .windows(input.needle.len())
        .position(|w| w == input.needle.as_slice())
        .map(|start| start + input.needle.len());

    let mut cursor = ByteCursor::new(input.haystack.as_slice());
    match (cursor.seek(&pattern), expected) {
        (Ok(()), Some(end)) => assert_eq!(cursor.offset(), end),
        (Err(_), None) => assert_eq!(cursor.offset(), input.haystack.len()),
        (got, want) => panic!("seek {got:?}, expected end {want:?}"),
    }
});
