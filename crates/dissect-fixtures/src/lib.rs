//! Synthetic dissect files.
//!
//! [`ReplayBuilder`] lays a file out in fixed sections so tests can
//! change one part without disturbing the rest:
//!
//! ```text
//! ┌────────────────────┬──────────────────────────────────────────────┐
//! │ versioning block   │ "dissect", 2 bytes, 7×0x00, 3 bytes, 7×0x00  │
//! │ properties         │ version, code, datetime, ... teamname1       │
//! │ gm settings        │ gmsetting pairs                              │
//! │ header players     │ playerid, playername, team, extra fields     │
//! │ trailer            │ playlistcategory, id, teamscore0, teamscore1 │
//! │ after header       │ pairs the decoder must never consume         │
//! │ body padding       │ filler the scanner has to search through     │
//! │ identity records   │ marker-anchored records, filler in between   │
//! └────────────────────┴──────────────────────────────────────────────┘
//! ```
//!
//! [`build`](ReplayBuilder::build) compresses the result the way the game
//! writes it; [`build_raw`](ReplayBuilder::build_raw) returns the
//! decompressed stream.

#![warn(clippy::pedantic)]
#![allow(clippy::missing_panics_doc)]

use dissect_wire::STRING_SEPARATOR;
use dissect_wire::markers::{
    DISSECT_MAGIC, PROFILE_ID_MARKER, TEAM_MARKER, TEAM_RECORD_GAP, UNKNOWN_BLOCK_LEN,
    UNKNOWN_MARKER,
};

/// Byte used between markers. Never starts a marker.
pub const FILLER: u8 = 0xAB;

/// Byte used for the 12-byte gap after the team indicator.
const GAP: u8 = 0x11;

const COMPRESSION_LEVEL: i32 = 3;

const DEFAULT_PROPERTIES: [(&str, &str); 15] = [
    ("version", "Y9S1"),
    ("code", "8155330"),
    ("datetime", "2024-03-09-20-15-42"),
    ("matchtype", "8"),
    ("worldid", "1604642924"),
    ("gamemodeid", "2838806006"),
    ("recordingplayerid", "1001"),
    ("recordingprofileid", "prof-recorder"),
    ("additionaltags", "ranked"),
    ("roundspermatch", "9"),
    ("roundspermatchovertime", "3"),
    ("roundnumber", "4"),
    ("overtimeroundnumber", "0"),
    ("teamname0", "BLUE"),
    ("teamname1", "ORANGE"),
];

const DEFAULT_TRAILER: [(&str, &str); 4] = [
    ("playlistcategory", "12"),
    ("id", "b7a1c2d3-match"),
    ("teamscore0", "2"),
    ("teamscore1", "1"),
];

/// Encode a header-region string: length, separator, payload.
#[must_use]
pub fn encode_header_string(s: &str) -> Vec<u8> {
    let mut out = vec![u8::try_from(s.len()).expect("header strings fit in one length byte")];
    out.extend_from_slice(&STRING_SEPARATOR);
    out.extend_from_slice(s.as_bytes());
    out
}

/// Encode a body-region string: length, payload.
#[must_use]
pub fn encode_body_string(s: &str) -> Vec<u8> {
    let mut out = vec![u8::try_from(s.len()).expect("body strings fit in one length byte")];
    out.extend_from_slice(s.as_bytes());
    out
}

/// Compress `raw` as one zstd frame.
#[must_use]
pub fn compress(raw: &[u8]) -> Vec<u8> {
    zstd::encode_all(raw, COMPRESSION_LEVEL).expect("in-memory zstd compression")
}

fn encode_pair(out: &mut Vec<u8>, key: &str, value: &str) {
    out.extend(encode_header_string(key));
    out.extend(encode_header_string(value));
}

/// One identity record as it appears after the header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub indicator: i32,
    pub username: String,
    pub profile_id: String,
    pub unknown: [u8; UNKNOWN_BLOCK_LEN],
}

impl Identity {
    #[must_use]
    pub fn new(indicator: i32, username: &str, profile_id: &str) -> Self {
        Self {
            indicator,
            username: username.to_owned(),
            profile_id: profile_id.to_owned(),
            unknown: [0x13; UNKNOWN_BLOCK_LEN],
        }
    }

    #[must_use]
    pub fn with_unknown(mut self, block: [u8; UNKNOWN_BLOCK_LEN]) -> Self {
        self.unknown = block;
        self
    }

    fn encode_into(&self, out: &mut Vec<u8>) {
        out.extend([FILLER; 8]);
        out.extend(TEAM_MARKER);
        out.extend(self.indicator.to_le_bytes());
        out.extend([GAP; TEAM_RECORD_GAP]);
        out.extend(encode_body_string(&self.username));
        out.extend([FILLER; 5]);
        out.extend(PROFILE_ID_MARKER);
        out.extend(encode_body_string(&self.profile_id));
        out.extend([FILLER; 3]);
        out.extend(UNKNOWN_MARKER);
        out.extend(self.unknown);
    }
}

/// Encode identity records back to back.
///
/// Each record is preceded by filler; nothing follows the last opaque
/// block, so truncating the output cuts into that block.
#[must_use]
pub fn encode_identity_records(records: &[Identity]) -> Vec<u8> {
    let mut out = Vec::new();
    for record in records {
        record.encode_into(&mut out);
    }
    out
}

/// Builder for a complete dissect file.
///
/// Starts from a valid header with no players. Every method consumes and
/// returns the builder so fixtures read as one chain.
///
/// ```rust
/// use dissect_fixtures::{Identity, ReplayBuilder};
///
/// let file = ReplayBuilder::new()
///     .header_player("1001", "Ash", 0)
///     .identity(Identity::new(7, "Ash", "prof-ash"))
///     .build();
/// assert!(!file.is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct ReplayBuilder {
    props: Vec<(String, String)>,
    gm_settings: Vec<i64>,
    players: Vec<Vec<(String, String)>>,
    trailer: Vec<(String, String)>,
    after_header: Vec<(String, String)>,
    identities: Vec<Identity>,
    body_padding: usize,
    trailing_bytes: Vec<u8>,
}

impl Default for ReplayBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn owned(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect()
}

impl ReplayBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            props: owned(&DEFAULT_PROPERTIES),
            gm_settings: Vec::new(),
            players: Vec::new(),
            trailer: owned(&DEFAULT_TRAILER),
            after_header: Vec::new(),
            identities: Vec::new(),
            body_padding: 16,
            trailing_bytes: Vec::new(),
        }
    }

    /// A full ten-player lobby, five per team, each with an identity
    /// record whose indicator agrees with the header team.
    #[must_use]
    pub fn lobby() -> Self {
        let mut builder = Self::new();
        for i in 0..10u8 {
            let team = i % 2;
            let name = format!("player{i}");
            builder = builder
                .header_player(&(2000 + u32::from(i)).to_string(), &name, team)
                .player_field("heroname", &(90 + u32::from(i)).to_string())
                .identity(Identity::new(
                    i32::from(1 - team) + 2 * i32::from(i),
                    &name,
                    &format!("prof-{i}"),
                ));
        }
        builder
    }

    /// Set a header property.
    ///
    /// An existing key keeps its position and takes the new value; a new
    /// key is appended to the main property section.
    #[must_use]
    pub fn property(mut self, key: &str, value: &str) -> Self {
        let existing = self
            .props
            .iter_mut()
            .chain(self.trailer.iter_mut())
            .find(|(k, _)| k == key);
        match existing {
            Some((_, v)) => value.clone_into(v),
            None => self.props.push((key.to_owned(), value.to_owned())),
        }
        self
    }

    #[must_use]
    pub fn without_property(mut self, key: &str) -> Self {
        self.props.retain(|(k, _)| k != key);
        self.trailer.retain(|(k, _)| k != key);
        self
    }

    #[must_use]
    pub fn gm_setting(mut self, value: i64) -> Self {
        self.gm_settings.push(value);
        self
    }

    /// Start a header player record.
    #[must_use]
    pub fn header_player(mut self, id: &str, username: &str, team: u8) -> Self {
        self.players.push(owned(&[
            ("playerid", id),
            ("playername", username),
            ("team", &team.to_string()),
        ]));
        self
    }

    /// Add a field to the most recent header player.
    #[must_use]
    pub fn player_field(mut self, key: &str, value: &str) -> Self {
        let player = self
            .players
            .last_mut()
            .expect("player_field needs a header_player first");
        player.push((key.to_owned(), value.to_owned()));
        self
    }

    /// Add a pair after `teamscore1`.
    #[must_use]
    pub fn trailing_property(mut self, key: &str, value: &str) -> Self {
        self.after_header.push((key.to_owned(), value.to_owned()));
        self
    }

    #[must_use]
    pub fn identity(mut self, identity: Identity) -> Self {
        self.identities.push(identity);
        self
    }

    /// Filler bytes between the header and the first identity record.
    #[must_use]
    pub fn body_padding(mut self, len: usize) -> Self {
        self.body_padding = len;
        self
    }

    /// Bytes appended after the compressed stream by
    /// [`build`](Self::build).
    #[must_use]
    pub fn trailing_bytes(mut self, bytes: &[u8]) -> Self {
        self.trailing_bytes.extend_from_slice(bytes);
        self
    }

    /// The decompressed stream.
    #[must_use]
    pub fn build_raw(&self) -> Vec<u8> {
        let mut out = DISSECT_MAGIC.to_vec();
        out.extend([0x01, 0x02]);
        out.extend([0x00; 7]);
        out.extend([0x0A, 0x0B, 0x0C]);
        out.extend([0x00; 7]);

        for (k, v) in &self.props {
            encode_pair(&mut out, k, v);
        }
        for setting in &self.gm_settings {
            encode_pair(&mut out, "gmsetting", &setting.to_string());
        }
        for (k, v) in self.players.iter().flatten() {
            encode_pair(&mut out, k, v);
        }
        for (k, v) in self.trailer.iter().chain(&self.after_header) {
            encode_pair(&mut out, k, v);
        }

        out.resize(out.len() + self.body_padding, FILLER);
        out.extend(encode_identity_records(&self.identities));
        out.extend([FILLER; 32]);
        out
    }

    /// The file as written to disk: one zstd frame plus any trailing
    /// bytes.
    #[must_use]
    pub fn build(&self) -> Vec<u8> {
        let mut out = compress(&self.build_raw());
        out.extend_from_slice(&self.trailing_bytes);
        out
    }

    /// Like [`build`](Self::build), but the stream is split into
    /// independent zstd frames of at most `chunk` decompressed bytes.
    #[must_use]
    pub fn build_framed(&self, chunk: usize) -> Vec<u8> {
        let mut out = Vec::new();
        for piece in self.build_raw().chunks(chunk) {
            out.extend(compress(piece));
        }
        out.extend_from_slice(&self.trailing_bytes);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    fn position(haystack: &[u8], needle: &[u8]) -> usize {
        haystack
            .windows(needle.len())
            .position(|w| w == needle)
            .unwrap()
    }

    #[test]
    fn header_string_layout() {
        assert_eq!(
            encode_header_string("id"),
            vec![2, 0, 0, 0, 0, 0, 0, 0, b'i', b'd']
        );
    }

    #[test]
    fn body_string_layout() {
        assert_eq!(encode_body_string("Ash"), vec![3, b'A', b's', b'h']);
    }

    #[test]
    fn raw_starts_with_magic_and_version_block() {
        let raw = ReplayBuilder::new().build_raw();
        assert_eq!(&raw[..7], b"dissect");
        assert_eq!(&raw[9..16], &[0; 7]);
        assert_eq!(&raw[19..26], &[0; 7]);
        assert_eq!(&raw[26..34], &encode_header_string("version")[..8]);
    }

    #[test]
    fn property_replaces_in_place() {
        let raw = ReplayBuilder::new().property("id", "other").build_raw();
        assert!(contains(&raw, &encode_header_string("other")));
        assert!(!contains(&raw, b"b7a1c2d3-match"));
        // Still before the scores.
        assert!(position(&raw, b"other") < position(&raw, b"teamscore0"));
    }

    #[test]
    fn without_property_removes_key() {
        let raw = ReplayBuilder::new().without_property("code").build_raw();
        assert!(!contains(&raw, &encode_header_string("code")));
    }

    #[test]
    fn players_sit_before_trailer() {
        let raw = ReplayBuilder::new()
            .header_player("1", "Ash", 0)
            .build_raw();
        assert!(position(&raw, b"playername") < position(&raw, b"playlistcategory"));
    }

    #[test]
    fn identity_record_markers_in_order() {
        let bytes = encode_identity_records(&[Identity::new(4, "Ash", "p")]);
        let team = position(&bytes, &TEAM_MARKER);
        let profile = position(&bytes, &PROFILE_ID_MARKER);
        let unknown = position(&bytes, &UNKNOWN_MARKER);
        assert!(team < profile && profile < unknown);
        assert_eq!(bytes.len(), unknown + UNKNOWN_MARKER.len() + UNKNOWN_BLOCK_LEN);
        assert_eq!(&bytes[team + 6..team + 10], &4i32.to_le_bytes());
    }

    #[test]
    fn build_is_zstd_of_raw() {
        let builder = ReplayBuilder::lobby().trailing_bytes(b"junk");
        let file = builder.build();
        assert!(file.ends_with(b"junk"));
        let body = &file[..file.len() - 4];
        assert_eq!(zstd::decode_all(body).unwrap(), builder.build_raw());
    }

    #[test]
    fn framed_build_concatenates_frames() {
        let builder = ReplayBuilder::lobby();
        let file = builder.build_framed(100);
        assert_eq!(zstd::decode_all(file.as_slice()).unwrap(), builder.build_raw());
    }
}
