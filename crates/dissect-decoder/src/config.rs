/// Default cap on identity records read by the player scanner.
pub const DEFAULT_MAX_PLAYER_RECORDS: usize = 10;

/// Configuration for [`DissectDecoder`](crate::DissectDecoder).
///
/// ```text
/// ┌────────────────────┬──────────────────────────────────────────────┐
/// │ Field              │ Purpose                                      │
/// ├────────────────────┼──────────────────────────────────────────────┤
/// │ max_player_records │ Upper bound on identity records scanned      │
/// │                    │ after the header (two teams of five)         │
/// └────────────────────┴──────────────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Stop the player scanner after this many identity records even if
    /// more team markers follow.
    pub max_player_records: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_player_records: DEFAULT_MAX_PLAYER_RECORDS,
        }
    }
}
