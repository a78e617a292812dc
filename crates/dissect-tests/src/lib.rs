//! Integration tests (`tests/`) and criterion benches (`benches/`) for the
//! dissect crates. Nothing here is meant to be linked.
