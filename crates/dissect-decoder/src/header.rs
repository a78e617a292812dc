use std::collections::HashMap;
use std::io::Read;

use chrono::NaiveDateTime;
use dissect_types::{GameMode, MapId, MatchHeader, MatchType, Team};
use dissect_wire::ByteCursor;
use dissect_wire::markers::DISSECT_MAGIC;

use crate::error::DecodeError;
use crate::grouping::{HeaderProperties, PropertyStream, parse_int};

/// Length of a zero run closing each part of the versioning block.
const ZERO_RUN_LEN: usize = 7;

/// Number of zero runs between the magic and the first header string.
const ZERO_RUNS_BEFORE_PROPERTIES: usize = 2;

/// `chrono` layout of the `datetime` property (`2024-03-09-20-15-00`).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

/// Validate the magic and skip the versioning block.
///
/// ```text
/// ┌─────────┬───────────────┬────────┬───────────────┬────────┬──────────────┐
/// │ dissect │ version bytes │ 7×0x00 │ version bytes │ 7×0x00 │ header pairs │
/// └─────────┴───────────────┴────────┴───────────────┴────────┴──────────────┘
/// ```
///
/// Zeros are counted as they stream past. A run counts once it reaches
/// seven, after which counting restarts, so fourteen zeros in a row are
/// two runs. A non-zero byte resets a partial run.
///
/// # Errors
///
/// - [`DecodeError::InvalidFormat`] if the magic is wrong.
/// - [`DecodeError::Wire`] if the stream ends or fails.
pub fn read_magic<R: Read>(cursor: &mut ByteCursor<R>) -> Result<(), DecodeError> {
    let magic = cursor.read_array::<7>()?;
    if magic != DISSECT_MAGIC {
        return Err(DecodeError::InvalidFormat {
            reason: "missing dissect magic",
        });
    }

    let mut zeros = 0;
    let mut runs = 0;
    while runs < ZERO_RUNS_BEFORE_PROPERTIES {
        if cursor.read_u8()? == 0x00 {
            zeros += 1;
            if zeros == ZERO_RUN_LEN {
                zeros = 0;
                runs += 1;
            }
        } else {
            zeros = 0;
        }
    }
    tracing::trace!(offset = cursor.offset(), "versioning block skipped");
    Ok(())
}

/// Decode the header's key/value region into a [`MatchHeader`].
///
/// Pairs are read with the header string framing until the pair that
/// introduces `teamscore1`. Players found here carry their header fields;
/// the player scanner adds profile ids afterwards.
///
/// # Errors
///
/// - [`DecodeError::Wire`] for framing problems or a truncated stream.
/// - [`DecodeError::MissingProperty`], [`DecodeError::InvalidInteger`],
///   [`DecodeError::InvalidTimestamp`] or [`DecodeError::InvalidTeamIndex`]
///   for unusable values.
pub fn read_header<R: Read>(cursor: &mut ByteCursor<R>) -> Result<MatchHeader, DecodeError> {
    let mut stream = PropertyStream::new();
    while !stream.is_complete() {
        let key = String::from_utf8_lossy(&cursor.read_header_string()?).into_owned();
        let value = String::from_utf8_lossy(&cursor.read_header_string()?).into_owned();
        stream.push(&key, &value)?;
    }
    tracing::debug!(offset = cursor.offset(), "header region complete");
    assemble(stream.finish())
}

/// Build the typed header from the collected properties.
///
/// # Errors
///
/// Same value errors as [`read_header`].
pub fn assemble(collected: HeaderProperties) -> Result<MatchHeader, DecodeError> {
    let HeaderProperties {
        props,
        gm_settings,
        players,
    } = collected;
    let fields = Fields(&props);

    let playlist_category = match fields.int::<i64>("playlistcategory") {
        Ok(n) => Some(n),
        Err(e) => {
            tracing::debug!(error = %e, "omitting playlistcategory");
            None
        }
    };

    Ok(MatchHeader {
        game_version: fields.text("version"),
        code_version: fields.int("code")?,
        timestamp: fields.timestamp("datetime")?,
        match_type: MatchType(fields.int("matchtype")?),
        map: MapId(fields.int("worldid")?),
        game_mode: GameMode(fields.int("gamemodeid")?),
        recording_player_id: fields.text("recordingplayerid"),
        recording_profile_id: fields.text("recordingprofileid"),
        additional_tags: fields.text("additionaltags"),
        rounds_per_match: fields.int("roundspermatch")?,
        rounds_per_match_overtime: fields.int("roundspermatchovertime")?,
        round_number: fields.int("roundnumber")?,
        overtime_round_number: fields.int("overtimeroundnumber")?,
        playlist_category,
        match_id: fields.text("id"),
        teams: [
            Team {
                name: fields.text("teamname0"),
                score: fields.int("teamscore0")?,
            },
            Team {
                name: fields.text("teamname1"),
                score: fields.int("teamscore1")?,
            },
        ],
        gm_settings,
        players,
    })
}

/// Typed lookups into the header property map.
struct Fields<'a>(&'a HashMap<String, String>);

impl Fields<'_> {
    fn raw(&self, key: &'static str) -> Result<&str, DecodeError> {
        self.0
            .get(key)
            .map(String::as_str)
            .ok_or(DecodeError::MissingProperty { key })
    }

    /// Optional text; absent keys read as empty.
    fn text(&self, key: &'static str) -> String {
        self.0.get(key).cloned().unwrap_or_default()
    }

    fn int<T: std::str::FromStr<Err = std::num::ParseIntError>>(
        &self,
        key: &'static str,
    ) -> Result<T, DecodeError> {
        parse_int(key, self.raw(key)?)
    }

    fn timestamp(&self, key: &'static str) -> Result<chrono::DateTime<chrono::Utc>, DecodeError> {
        let value = self.raw(key)?;
        NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
            .map(|t| t.and_utc())
            .map_err(|source| DecodeError::InvalidTimestamp {
                value: value.to_owned(),
                source,
            })
    }
}
