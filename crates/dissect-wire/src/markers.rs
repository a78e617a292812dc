//! Fixed byte sequences that anchor the unframed regions of the format.

/// The literal every decompressed dissect stream starts with.
pub const DISSECT_MAGIC: [u8; 7] = *b"dissect";

/// Precedes the 4-byte team indicator of each identity record.
pub const TEAM_MARKER: [u8; 6] = [0x22, 0x95, 0x1C, 0x16, 0x50, 0x08];

/// Precedes the body string holding a player's profile id.
pub const PROFILE_ID_MARKER: [u8; 4] = [0x8A, 0x50, 0x9B, 0xD0];

/// Precedes the opaque per-player block.
pub const UNKNOWN_MARKER: [u8; 6] = [0x22, 0xEE, 0xD4, 0x45, 0xC8, 0x08];

/// Size of the opaque block after [`UNKNOWN_MARKER`].
pub const UNKNOWN_BLOCK_LEN: usize = 30;

/// Bytes between the team indicator and the username; contents unknown.
pub const TEAM_RECORD_GAP: usize = 12;
