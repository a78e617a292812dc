/// dissect command-line tool: summarise, dump and validate replay files
/// written by the game's match recorder.
///
/// # Command overview
///
/// ```text
/// dissect <COMMAND> [OPTIONS]
///
/// Commands:
///   info       Print a human-readable match summary
///   json       Dump the decoded match header as JSON
///   validate   Check that a file decodes end to end
///   help       Print help information
///
/// Global options:
///   -v, --verbose        Log decoder progress (debug level)
///   --max-players <N>    Identity records to scan after the header [10]
///   -h, --help           Print help
///   -V, --version        Print version
/// ```
///
/// `RUST_LOG` overrides the log filter chosen by `--verbose`.
///
/// # Exit codes
///
/// | Code | Meaning                                   |
/// |------|-------------------------------------------|
/// | 0    | Success                                   |
/// | 1    | Error (I/O failure, undecodable file, ...) |
///
/// Logs and errors go to stderr so stdout can be piped cleanly.
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use dissect_decoder::config::DEFAULT_MAX_PLAYER_RECORDS;
use dissect_decoder::{DecoderConfig, DissectDecoder};
use tracing_subscriber::EnvFilter;

mod cmd_info;
mod cmd_json;
mod cmd_validate;

// ── CLI root ──────────────────────────────────────────────────────────────────

/// Decoder for dissect replay files.
#[derive(Parser)]
#[command(name = "dissect", version, about = "dissect replay file tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log decoder progress at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Stop scanning identity records after this many.
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_PLAYER_RECORDS)]
    max_players: usize,
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Print a human-readable match summary.
    Info(InfoArgs),
    /// Dump the decoded match header as JSON.
    Json(JsonArgs),
    /// Check that a file decodes end to end.
    Validate(ValidateArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Arguments for `dissect info`.
///
/// ```text
/// ┌───────────────────┬─────────────────────────────────────────────────┐
/// │ Flag              │ Effect                                          │
/// ├───────────────────┼─────────────────────────────────────────────────┤
/// │ --compare-unknown │ Print every player's opaque 30-byte block with  │
/// │                   │ differing byte positions marked                 │
/// └───────────────────┴─────────────────────────────────────────────────┘
/// ```
#[derive(clap::Args)]
pub struct InfoArgs {
    /// Path to the replay file.
    pub file: PathBuf,

    /// Print the per-player opaque blocks side by side.
    #[arg(long)]
    pub compare_unknown: bool,
}

/// Arguments for `dissect json`.
#[derive(clap::Args)]
pub struct JsonArgs {
    /// Path to the replay file.
    pub file: PathBuf,

    /// Indent the output.
    #[arg(long)]
    pub pretty: bool,

    /// Write to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `dissect validate`.
///
/// Runs a full decode and prints `✓` lines on success or one `✗`
/// diagnostic on failure. Exit code 1 on failure.
#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Path to the replay file.
    pub file: PathBuf,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let decoder = DissectDecoder::new(DecoderConfig {
        max_player_records: cli.max_players,
    });

    let result = match cli.command {
        Commands::Info(args) => cmd_info::run(&args, &decoder),
        Commands::Json(args) => cmd_json::run(&args, &decoder),
        Commands::Validate(args) => cmd_validate::run(&args, &decoder),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
