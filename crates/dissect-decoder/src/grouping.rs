use std::collections::HashMap;

use dissect_types::{Player, TeamIndex};

use crate::error::DecodeError;

/// Key that opens a player record.
pub const PLAYER_ID_KEY: &str = "playerid";
/// Keys that close an open player record and are then recorded as
/// ordinary header properties.
pub const PLAYER_TERMINATOR_KEYS: [&str; 2] = ["playlistcategory", "id"];
/// Key collected into the GM settings list instead of the property map.
pub const GM_SETTING_KEY: &str = "gmsetting";
/// The header loop stops after the pair that introduces this key.
pub const LAST_HEADER_KEY: &str = "teamscore1";

/// Which kind of record the property stream is currently filling.
///
/// ```text
///                 playerid
///   ┌────────┐ ─────────────► ┌──────────────┐ ──┐ playerid
///   │ Header │                │ PlayerRecord │   │ (finish + begin)
///   └────────┘ ◄───────────── └──────────────┘ ◄─┘
///        playlistcategory / id  (finish, then record as property)
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GroupState {
    #[default]
    Header,
    PlayerRecord,
}

/// What happens to the in-progress player when a key is seen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Boundary {
    /// Nothing; keep filling the current record.
    None,
    /// Start a fresh player record.
    Begin,
    /// Append the current player to the list.
    Finish,
    /// Append the current player, then start a fresh one.
    FinishAndBegin,
}

impl GroupState {
    /// Transition function for the grouping machine.
    ///
    /// Returns the state that the key's value belongs to and what to do
    /// with the in-progress player before recording it.
    #[must_use]
    pub fn on_key(self, key: &str) -> (Self, Boundary) {
        match (self, key) {
            (Self::Header, PLAYER_ID_KEY) => (Self::PlayerRecord, Boundary::Begin),
            (Self::PlayerRecord, PLAYER_ID_KEY) => (Self::PlayerRecord, Boundary::FinishAndBegin),
            (Self::PlayerRecord, k) if PLAYER_TERMINATOR_KEYS.contains(&k) => {
                (Self::Header, Boundary::Finish)
            }
            (state, _) => (state, Boundary::None),
        }
    }
}

/// Accumulator for the header's key/value stream.
///
/// Feed every pair through [`push`](Self::push) in file order; once
/// [`is_complete`](Self::is_complete) turns true the header region is
/// over and [`finish`](Self::finish) hands back what was collected.
#[derive(Debug, Default)]
pub struct PropertyStream {
    state: GroupState,
    current: Player,
    players: Vec<Player>,
    props: HashMap<String, String>,
    gm_settings: Vec<i64>,
}

/// Everything collected from the header region.
#[derive(Debug, Default)]
pub struct HeaderProperties {
    pub props: HashMap<String, String>,
    pub gm_settings: Vec<i64>,
    pub players: Vec<Player>,
}

impl PropertyStream {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> GroupState {
        self.state
    }

    /// Apply one key/value pair.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::InvalidInteger`] for a non-numeric `gmsetting` or
    ///   numeric player field.
    /// - [`DecodeError::InvalidTeamIndex`] for a player `team` other than
    ///   0 or 1.
    pub fn push(&mut self, key: &str, value: &str) -> Result<(), DecodeError> {
        let (next, boundary) = self.state.on_key(key);
        match boundary {
            Boundary::None => {}
            Boundary::Begin => self.current = Player::default(),
            Boundary::Finish => self.finish_player(),
            Boundary::FinishAndBegin => {
                self.finish_player();
                self.current = Player::default();
            }
        }
        if next != self.state {
            tracing::trace!(key, from = ?self.state, to = ?next, "grouping transition");
        }
        self.state = next;

        match self.state {
            GroupState::Header => self.record_property(key, value),
            GroupState::PlayerRecord => self.record_player_field(key, value),
        }
    }

    /// True once the pair introducing `teamscore1` has been recorded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.props.contains_key(LAST_HEADER_KEY)
    }

    /// Hand back what was collected.
    ///
    /// A player record that was never closed by a terminator key is
    /// dropped.
    #[must_use]
    pub fn finish(self) -> HeaderProperties {
        if self.state == GroupState::PlayerRecord {
            tracing::debug!(
                player_id = %self.current.id,
                "player record still open at end of header, dropping it"
            );
        }
        HeaderProperties {
            props: self.props,
            gm_settings: self.gm_settings,
            players: self.players,
        }
    }

    fn finish_player(&mut self) {
        self.players.push(std::mem::take(&mut self.current));
    }

    fn record_property(&mut self, key: &str, value: &str) -> Result<(), DecodeError> {
        if key == GM_SETTING_KEY {
            self.gm_settings.push(parse_int(key, value)?);
        } else {
            self.props.insert(key.to_owned(), value.to_owned());
        }
        Ok(())
    }

    fn record_player_field(&mut self, key: &str, value: &str) -> Result<(), DecodeError> {
        let player = &mut self.current;
        match key {
            "playerid" => player.id = value.to_owned(),
            "playername" => player.username = value.to_owned(),
            "team" => {
                let raw = parse_int(key, value)?;
                player.team_index =
                    TeamIndex::new(raw).ok_or(DecodeError::InvalidTeamIndex { value: raw })?;
            }
            "heroname" => player.hero_name = Some(parse_int(key, value)?),
            "alliance" => player.alliance = Some(parse_int(key, value)?),
            "roleimage" => player.role_image = Some(parse_int(key, value)?),
            "rolename" => player.role_name = Some(value.to_owned()),
            "roleportrait" => player.role_portrait = Some(parse_int(key, value)?),
            _ => {}
        }
        Ok(())
    }
}

pub(crate) fn parse_int<T: std::str::FromStr<Err = std::num::ParseIntError>>(
    key: &str,
    value: &str,
) -> Result<T, DecodeError> {
    value.parse().map_err(|source| DecodeError::InvalidInteger {
        key: key.to_owned(),
        value: value.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(pairs: &[(&str, &str)]) -> HeaderProperties {
        let mut stream = PropertyStream::new();
        for (k, v) in pairs {
            stream.push(k, v).unwrap();
            if stream.is_complete() {
                break;
            }
        }
        stream.finish()
    }

    #[test]
    fn transitions_from_header() {
        assert_eq!(
            GroupState::Header.on_key("playerid"),
            (GroupState::PlayerRecord, Boundary::Begin)
        );
        assert_eq!(
            GroupState::Header.on_key("id"),
            (GroupState::Header, Boundary::None)
        );
        assert_eq!(
            GroupState::Header.on_key("playlistcategory"),
            (GroupState::Header, Boundary::None)
        );
        assert_eq!(
            GroupState::Header.on_key("version"),
            (GroupState::Header, Boundary::None)
        );
    }

    #[test]
    fn transitions_from_player_record() {
        assert_eq!(
            GroupState::PlayerRecord.on_key("playerid"),
            (GroupState::PlayerRecord, Boundary::FinishAndBegin)
        );
        assert_eq!(
            GroupState::PlayerRecord.on_key("id"),
            (GroupState::Header, Boundary::Finish)
        );
        assert_eq!(
            GroupState::PlayerRecord.on_key("playlistcategory"),
            (GroupState::Header, Boundary::Finish)
        );
        assert_eq!(
            GroupState::PlayerRecord.on_key("teamscore1"),
            (GroupState::PlayerRecord, Boundary::None)
        );
    }

    #[test]
    fn adjacent_player_records_do_not_bleed() {
        let out = feed(&[
            ("playerid", "11"),
            ("playername", "Ash"),
            ("team", "0"),
            ("heroname", "92"),
            ("playerid", "12"),
            ("playername", "Thermite"),
            ("team", "1"),
            ("id", "match-1"),
            ("teamscore1", "2"),
        ]);
        assert_eq!(out.players.len(), 2);
        let (a, b) = (&out.players[0], &out.players[1]);
        assert_eq!((a.id.as_str(), a.username.as_str()), ("11", "Ash"));
        assert_eq!(a.team_index, TeamIndex::ZERO);
        assert_eq!(a.hero_name, Some(92));
        assert_eq!((b.id.as_str(), b.username.as_str()), ("12", "Thermite"));
        assert_eq!(b.team_index, TeamIndex::ONE);
        assert_eq!(b.hero_name, None);
    }

    #[test]
    fn terminator_key_finishes_player_then_records_property() {
        let out = feed(&[
            ("playerid", "11"),
            ("playername", "Ash"),
            ("id", "match-1"),
            ("teamscore1", "0"),
        ]);
        assert_eq!(out.players.len(), 1);
        assert_eq!(out.players[0].username, "Ash");
        assert_eq!(out.props["id"], "match-1");
        // The terminator's value belongs to the header, not the player.
        assert_eq!(out.players[0].id, "11");
    }

    #[test]
    fn playlistcategory_terminates_too() {
        let out = feed(&[
            ("playerid", "11"),
            ("playlistcategory", "7"),
            ("playerid", "12"),
            ("id", "m"),
            ("teamscore1", "0"),
        ]);
        assert_eq!(out.players.len(), 2);
        assert_eq!(out.props["playlistcategory"], "7");
        assert_eq!(out.props["id"], "m");
    }

    #[test]
    fn unknown_player_keys_are_dropped() {
        let out = feed(&[
            ("playerid", "1"),
            ("favouritecolour", "blue"),
            ("id", "m"),
            ("teamscore1", "0"),
        ]);
        assert!(!out.props.contains_key("favouritecolour"));
        assert_eq!(out.players.len(), 1);
    }

    #[test]
    fn gm_settings_collected_in_order() {
        let out = feed(&[
            ("gmsetting", "3"),
            ("version", "Y9S1"),
            ("gmsetting", "-1"),
            ("teamscore1", "0"),
        ]);
        assert_eq!(out.gm_settings, vec![3, -1]);
        assert!(!out.props.contains_key("gmsetting"));
    }

    #[test]
    fn bad_gm_setting_is_fatal() {
        let mut stream = PropertyStream::new();
        let err = stream.push("gmsetting", "on").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidInteger { ref key, .. } if key == "gmsetting"));
    }

    #[test]
    fn bad_player_number_is_fatal() {
        let mut stream = PropertyStream::new();
        stream.push("playerid", "1").unwrap();
        assert!(matches!(
            stream.push("alliance", "x"),
            Err(DecodeError::InvalidInteger { .. })
        ));
    }

    #[test]
    fn team_out_of_range_is_fatal() {
        let mut stream = PropertyStream::new();
        stream.push("playerid", "1").unwrap();
        assert!(matches!(
            stream.push("team", "2"),
            Err(DecodeError::InvalidTeamIndex { value: 2 })
        ));
    }

    #[test]
    fn teamscore1_inside_player_record_does_not_complete() {
        let mut stream = PropertyStream::new();
        stream.push("playerid", "1").unwrap();
        stream.push("teamscore1", "4").unwrap();
        assert!(!stream.is_complete());
        stream.push("id", "m").unwrap();
        stream.push("teamscore1", "4").unwrap();
        assert!(stream.is_complete());
    }

    #[test]
    fn open_player_record_dropped_at_finish() {
        let mut stream = PropertyStream::new();
        stream.push("playerid", "1").unwrap();
        stream.push("playername", "Ash").unwrap();
        assert_eq!(stream.state(), GroupState::PlayerRecord);
        assert!(stream.finish().players.is_empty());
    }

    #[test]
    fn role_fields_populated() {
        let out = feed(&[
            ("playerid", "1"),
            ("roleimage", "10"),
            ("rolename", "Entry"),
            ("roleportrait", "20"),
            ("id", "m"),
            ("teamscore1", "0"),
        ]);
        let p = &out.players[0];
        assert_eq!(p.role_image, Some(10));
        assert_eq!(p.role_name.as_deref(), Some("Entry"));
        assert_eq!(p.role_portrait, Some(20));
    }
}
