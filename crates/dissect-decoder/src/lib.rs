#![warn(clippy::pedantic)]

pub mod config;
pub mod decoder;
pub mod diagnostics;
pub mod error;
pub mod grouping;
pub mod header;
pub mod players;

mod decompression;

pub use config::DecoderConfig;
pub use decoder::DissectDecoder;
pub use diagnostics::{HexComparison, NullSink, UNKNOWN_BLOCK_LEN, UnknownBlockSink};
pub use error::DecodeError;
