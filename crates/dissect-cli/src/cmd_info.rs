/// Implementation of `dissect info`.
///
/// # Example output
///
/// ```text
/// File:      Match-2024-03-09_20-15-42-1.rec
/// Game:      Y9S1 (code 8155330)
/// Recorded:  2024-03-09 20:15:42 UTC
/// Match:     b7a1c2d3-match
/// Type:      8   Map: 1604642924   Mode: 2838806006   Playlist: 12
/// Rounds:    round 4 of 9, overtime 0 of 3
/// Score:     BLUE 2 : 1 ORANGE  (BLUE wins)
/// GM:        3 settings
///
/// Team 0  BLUE
///   Ash                prof-ash             id 1001
/// Team 1  ORANGE
///   Thermite           prof-thermite        id 1002
/// ```
///
/// With `--compare-unknown` the opaque per-player blocks follow the
/// roster, one row per player with differing positions marked.
use std::fs::File;
use std::io::BufReader;

use anyhow::{Context, Result};
use dissect_decoder::{DissectDecoder, HexComparison, NullSink, UNKNOWN_BLOCK_LEN, UnknownBlockSink};
use dissect_types::{MatchHeader, TeamIndex};

use crate::InfoArgs;

/// Keeps the rendered comparison once the scanner flushes it.
#[derive(Default)]
struct CapturedComparison {
    inner: HexComparison,
    rendered: Option<String>,
}

impl UnknownBlockSink for CapturedComparison {
    fn push(&mut self, username: &str, block: &[u8; UNKNOWN_BLOCK_LEN]) {
        self.inner.push(username, block);
    }

    fn flush(&mut self) {
        if !self.inner.rows().is_empty() {
            self.rendered = Some(self.inner.render());
        }
        self.inner.flush();
    }
}

/// Run the `dissect info` command.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or does not decode.
pub fn run(args: &InfoArgs, decoder: &DissectDecoder) -> Result<()> {
    let file =
        File::open(&args.file).with_context(|| format!("cannot open {}", args.file.display()))?;

    let mut captured = CapturedComparison::default();
    let mut null = NullSink;
    let sink: &mut dyn UnknownBlockSink = if args.compare_unknown {
        &mut captured
    } else {
        &mut null
    };
    let header = decoder
        .decode_with_sink(BufReader::new(file), sink)
        .with_context(|| format!("failed to decode {}", args.file.display()))?;

    print_summary(args, &header);

    if args.compare_unknown {
        println!();
        match captured.rendered {
            Some(table) => print!("{table}"),
            None => println!("(no identity records)"),
        }
    }
    Ok(())
}

fn print_summary(args: &InfoArgs, h: &MatchHeader) {
    let [blue, orange] = &h.teams;

    println!("File:      {}", args.file.display());
    println!("Game:      {} (code {})", h.game_version, h.code_version);
    println!("Recorded:  {}", h.timestamp.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("Match:     {}", h.match_id);
    let playlist = h
        .playlist_category
        .map_or_else(|| "-".to_string(), |p| p.to_string());
    println!(
        "Type:      {}   Map: {}   Mode: {}   Playlist: {playlist}",
        h.match_type, h.map, h.game_mode
    );
    println!(
        "Rounds:    round {} of {}, overtime {} of {}",
        h.round_number,
        h.rounds_per_match,
        h.overtime_round_number,
        h.rounds_per_match_overtime
    );
    let outcome = match h.winning_team() {
        Some(t) => format!("{} wins", h.teams[t.as_usize()].name),
        None => "tied".to_string(),
    };
    println!(
        "Score:     {} {} : {} {}  ({outcome})",
        blue.name, blue.score, orange.score, orange.name
    );
    println!("GM:        {} settings", h.gm_settings.len());

    for team in [TeamIndex::ZERO, TeamIndex::ONE] {
        println!();
        println!("Team {}  {}", team.get(), h.teams[team.as_usize()].name);
        for p in h.team_players(team) {
            let profile = if p.profile_id.is_empty() {
                "-"
            } else {
                p.profile_id.as_str()
            };
            if p.id.is_empty() {
                println!("  {:<18} {profile}", p.username);
            } else {
                println!("  {:<18} {profile:<20} id {}", p.username, p.id);
            }
        }
    }
}
