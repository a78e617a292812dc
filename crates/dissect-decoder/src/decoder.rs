use std::io::{BufReader, Read};

use dissect_types::MatchHeader;
use dissect_wire::ByteCursor;

use crate::config::DecoderConfig;
use crate::decompression;
use crate::diagnostics::{NullSink, UnknownBlockSink};
use crate::error::DecodeError;
use crate::header;
use crate::players::PlayerScanner;

/// Synchronous dissect decoder.
///
/// Decoding is one forward pass over the decompressed stream:
///
///   1. **Decompression**: open the zstd frames. Input that is not zstd is
///      rejected as [`DecodeError::InvalidFormat`].
///   2. **Magic**: require `dissect`, skip the versioning block.
///   3. **Header**: read key/value pairs up to `teamscore1`, grouping player
///      records as they appear, and build the [`MatchHeader`].
///   4. **Identity records**: scan the rest of the stream for per-player
///      markers and merge profile ids and teams into the player list.
///
/// The decoder holds only configuration, so one value can decode any
/// number of files.
///
/// # Example
///
/// ```rust,no_run
/// use std::fs::File;
///
/// use dissect_decoder::DissectDecoder;
///
/// let file = File::open("Match-2024-03-09_20-15-42-1.rec").unwrap();
/// let header = DissectDecoder::default().decode(file).unwrap();
/// println!("{} vs {}", header.teams[0].name, header.teams[1].name);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct DissectDecoder {
    config: DecoderConfig,
}

impl DissectDecoder {
    #[must_use]
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> DecoderConfig {
        self.config
    }

    /// Decode a compressed dissect file.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::InvalidFormat`] if the input is not zstd or the
    ///   decompressed stream lacks the `dissect` magic.
    /// - [`DecodeError::Wire`] for truncated or desynchronised streams.
    /// - Header value errors (see [`header::read_header`]).
    pub fn decode<R: Read>(&self, reader: R) -> Result<MatchHeader, DecodeError> {
        self.decode_with_sink(reader, &mut NullSink)
    }

    /// Decode an in-memory compressed file.
    ///
    /// # Errors
    ///
    /// Same as [`decode`](Self::decode).
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<MatchHeader, DecodeError> {
        self.decode(bytes)
    }

    /// Decode a compressed file, sending each player's opaque block to
    /// `sink`.
    ///
    /// # Errors
    ///
    /// Same as [`decode`](Self::decode).
    pub fn decode_with_sink<R: Read>(
        &self,
        reader: R,
        sink: &mut dyn UnknownBlockSink,
    ) -> Result<MatchHeader, DecodeError> {
        let mut frames = BufReader::new(decompression::open(reader)?);
        let header = self.decode_decompressed(&mut frames, sink)?;
        tracing::debug!(frames = frames.get_ref().frames(), "zstd frames opened");
        Ok(header)
    }

    /// Decode a stream that has already been decompressed and starts with
    /// the `dissect` magic.
    ///
    /// # Errors
    ///
    /// Same as [`decode`](Self::decode), minus the zstd check.
    pub fn decode_decompressed<R: Read>(
        &self,
        reader: R,
        sink: &mut dyn UnknownBlockSink,
    ) -> Result<MatchHeader, DecodeError> {
        let mut cursor = ByteCursor::new(reader);

        header::read_magic(&mut cursor)?;
        let mut match_header = header::read_header(&mut cursor)?;

        let scanner = PlayerScanner::new(self.config.max_player_records);
        let found = scanner.scan(&mut cursor, &mut match_header.players, sink)?;

        tracing::debug!(
            bytes = cursor.offset(),
            identity_records = found,
            players = match_header.players.len(),
            "decode complete"
        );
        Ok(match_header)
    }
}
