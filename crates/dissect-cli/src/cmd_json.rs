/// Implementation of `dissect json`.
///
/// Serialises the decoded [`MatchHeader`](dissect_types::MatchHeader) with
/// `serde_json`. The timestamp is RFC 3339 in UTC; ids are plain numbers;
/// optional player fields that were never seen are left out.
///
/// ```json
/// {
///   "game_version": "Y9S1",
///   "timestamp": "2024-03-09T20:15:42Z",
///   "teams": [{ "name": "BLUE", "score": 2 }, { "name": "ORANGE", "score": 1 }],
///   "players": [{ "id": "1001", "profile_id": "prof-ash", "username": "Ash", "team_index": 0 }]
/// }
/// ```
use std::fs::{self, File};
use std::io::BufReader;

use anyhow::{Context, Result};
use dissect_decoder::DissectDecoder;

use crate::JsonArgs;

/// Run the `dissect json` command.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoded, or the
/// output file cannot be written.
pub fn run(args: &JsonArgs, decoder: &DissectDecoder) -> Result<()> {
    let file =
        File::open(&args.file).with_context(|| format!("cannot open {}", args.file.display()))?;
    let header = decoder
        .decode(BufReader::new(file))
        .with_context(|| format!("failed to decode {}", args.file.display()))?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&header)
    } else {
        serde_json::to_string(&header)
    }
    .context("failed to serialise match header")?;

    match &args.output {
        Some(path) => {
            fs::write(path, format!("{json}\n"))
                .with_context(|| format!("cannot write {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = json.len() + 1, "wrote match header");
        }
        None => println!("{json}"),
    }
    Ok(())
}
