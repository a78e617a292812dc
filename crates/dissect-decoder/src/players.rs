use std::io::Read;

use dissect_types::{Player, TeamIndex};
use dissect_wire::markers::{
    PROFILE_ID_MARKER, TEAM_MARKER, TEAM_RECORD_GAP, UNKNOWN_BLOCK_LEN, UNKNOWN_MARKER,
};
use dissect_wire::{ByteCursor, Pattern, WireError};

use crate::diagnostics::UnknownBlockSink;
use crate::error::DecodeError;

/// One identity record found after the header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentityRecord {
    pub username: String,
    pub profile_id: String,
    pub team_index: TeamIndex,
}

/// Team index carried by a raw team indicator: even → 1, odd → 0.
#[must_use]
pub fn team_from_indicator(indicator: i32) -> TeamIndex {
    if indicator.rem_euclid(2) == 0 {
        TeamIndex::ONE
    } else {
        TeamIndex::ZERO
    }
}

/// Scans the post-header stream for identity records.
///
/// Each record is anchored on fixed markers rather than framed:
///
/// ```text
///   … TEAM_MARKER │ i32 indicator │ 12 bytes │ len │ username │
///   … PROFILE_ID_MARKER │ len │ profile id │
///   … UNKNOWN_MARKER │ 30 bytes │
/// ```
///
/// The scanner owns the compiled markers so they are built once per
/// decode.
pub struct PlayerScanner {
    team: Pattern,
    profile_id: Pattern,
    unknown: Pattern,
    max_records: usize,
}

impl PlayerScanner {
    #[must_use]
    pub fn new(max_records: usize) -> Self {
        Self {
            team: Pattern::from(&TEAM_MARKER),
            profile_id: Pattern::from(&PROFILE_ID_MARKER),
            unknown: Pattern::from(&UNKNOWN_MARKER),
            max_records,
        }
    }

    /// Read identity records and merge them into `players`.
    ///
    /// Stops after `max_records` records or when no further team marker
    /// exists. Every other failure aborts, including a profile-id or
    /// unknown-block marker that never shows up.
    ///
    /// # Errors
    ///
    /// [`DecodeError::Wire`] for any read or search failure other than
    /// running out of team markers.
    pub fn scan<R: Read>(
        &self,
        cursor: &mut ByteCursor<R>,
        players: &mut Vec<Player>,
        sink: &mut dyn UnknownBlockSink,
    ) -> Result<usize, DecodeError> {
        let mut found = 0;
        while found < self.max_records {
            if let Err(e) = cursor.seek(&self.team) {
                let e = DecodeError::from(e);
                if e.is_end_of_records() {
                    tracing::debug!(offset = cursor.offset(), found, "no more identity records");
                    break;
                }
                return Err(e);
            }
            let record = self.read_record(cursor, sink)?;
            tracing::debug!(
                username = %record.username,
                team_index = record.team_index.get(),
                profile_id = %record.profile_id,
                "identity record"
            );
            reconcile(players, record);
            found += 1;
        }
        sink.flush();
        Ok(found)
    }

    /// Read the rest of a record once its team marker has been consumed.
    /// A marker missing here means a broken record, so every error is
    /// returned as is.
    fn read_record<R: Read>(
        &self,
        cursor: &mut ByteCursor<R>,
        sink: &mut dyn UnknownBlockSink,
    ) -> Result<IdentityRecord, WireError> {
        let team_index = team_from_indicator(cursor.read_int()?);
        cursor.skip(TEAM_RECORD_GAP)?;
        let username = String::from_utf8_lossy(&cursor.read_string()?).into_owned();

        cursor.seek(&self.profile_id)?;
        let profile_id = String::from_utf8_lossy(&cursor.read_string()?).into_owned();

        cursor.seek(&self.unknown)?;
        let block = cursor.read_array::<UNKNOWN_BLOCK_LEN>()?;
        sink.push(&username, &block);

        Ok(IdentityRecord {
            username,
            profile_id,
            team_index,
        })
    }
}

/// Merge a record into the player list by username.
///
/// A matching player gets the record's profile id and team index;
/// otherwise a minimal player is appended.
pub fn reconcile(players: &mut Vec<Player>, record: IdentityRecord) {
    if let Some(existing) = players.iter_mut().find(|p| p.username == record.username) {
        existing.profile_id = record.profile_id;
        existing.team_index = record.team_index;
    } else {
        players.push(Player::from_identity(
            record.username,
            record.profile_id,
            record.team_index,
        ));
    }
}
