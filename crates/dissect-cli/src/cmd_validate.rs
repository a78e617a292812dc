/// Implementation of `dissect validate`.
///
/// # Success output
///
/// ```text
/// ✓ Compression: zstd
/// ✓ Header: Y9S1, match b7a1c2d3-match
/// ✓ Players: 10 (10 with profile ids)
/// ```
///
/// # Failure output
///
/// ```text
/// ✗ Error: header out of sync at byte 241 (separator 00 00 00 09 00 00 00)
/// ```
///
/// A single decode covers every layer (decompression, magic, header
/// pairs, identity records), so passing means the whole file was read.
use std::fs::File;
use std::io::BufReader;

use anyhow::{Context, Result, anyhow};
use dissect_decoder::{DecodeError, DissectDecoder};
use dissect_wire::WireError;

use crate::ValidateArgs;

/// Run the `dissect validate` command.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or fails to decode.
pub fn run(args: &ValidateArgs, decoder: &DissectDecoder) -> Result<()> {
    let file =
        File::open(&args.file).with_context(|| format!("cannot open {}", args.file.display()))?;

    match decoder.decode(BufReader::new(file)) {
        Ok(header) => {
            let profiled = header
                .players
                .iter()
                .filter(|p| !p.profile_id.is_empty())
                .count();
            println!("✓ Compression: zstd");
            println!("✓ Header: {}, match {}", header.game_version, header.match_id);
            println!(
                "✓ Players: {} ({profiled} with profile ids)",
                header.players.len()
            );
            Ok(())
        }
        Err(e) => {
            println!("✗ Error: {}", decode_error_diagnostic(&e));
            Err(anyhow!("validation failed"))
        }
    }
}

// ── Error formatting ──────────────────────────────────────────────────────────

/// Turns a `DecodeError` into a one-line diagnostic.
///
/// ```text
/// ┌──────────────────────────────┬────────────────────────────────────────┐
/// │ DecodeError variant          │ Diagnostic                             │
/// ├──────────────────────────────┼────────────────────────────────────────┤
/// │ Wire(UnexpectedEof)          │ "file truncated at byte N"             │
/// │ Wire(InvalidSeparator)       │ "header out of sync at byte N (...)"   │
/// │ Wire(PatternNotFound)        │ "identity record incomplete ..."       │
/// │ anything else                │ "<error Display>"                      │
/// └──────────────────────────────┴────────────────────────────────────────┘
/// ```
fn decode_error_diagnostic(e: &DecodeError) -> String {
    match e {
        DecodeError::Wire(WireError::UnexpectedEof { offset }) => {
            format!("file truncated at byte {offset}")
        }
        DecodeError::Wire(WireError::InvalidSeparator { offset, found }) => {
            let bytes: Vec<String> = found.iter().map(|b| format!("{b:02x}")).collect();
            format!(
                "header out of sync at byte {offset} (separator {})",
                bytes.join(" ")
            )
        }
        DecodeError::Wire(WireError::PatternNotFound { offset }) => {
            format!("identity record incomplete, marker missing before byte {offset}")
        }
        other => other.to_string(),
    }
}
