use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::ids::{GameMode, MapId, MatchType};
use crate::player::{Player, TeamIndex};

/// One of the two teams, identified by the numeric suffix of its
/// `teamname<N>` / `teamscore<N>` header keys.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Team {
    pub name: String,
    pub score: u32,
}

/// Everything decoded from one dissect file.
///
/// ```text
/// ┌───────────────────────────────────────────────────────────┐
/// │ MatchHeader                                               │
/// │   game_version, code_version, timestamp                   │
/// │   match_type, map, game_mode          ← raw ids           │
/// │   round counters, playlist_category   ← optional          │
/// │   teams[0], teams[1]                  ← name + score      │
/// │   gm_settings                         ← in file order     │
/// │   players                             ← header + scanner  │
/// └───────────────────────────────────────────────────────────┘
/// ```
///
/// A value of this type is only ever produced by a complete decode; there
/// is no partially filled header.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MatchHeader {
    pub game_version: String,
    pub code_version: u32,
    pub timestamp: DateTime<Utc>,
    pub match_type: MatchType,
    pub map: MapId,
    pub game_mode: GameMode,
    pub recording_player_id: String,
    pub recording_profile_id: String,
    pub additional_tags: String,
    pub rounds_per_match: u32,
    pub rounds_per_match_overtime: u32,
    pub round_number: u32,
    pub overtime_round_number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playlist_category: Option<i64>,
    pub match_id: String,
    pub teams: [Team; 2],
    pub gm_settings: Vec<i64>,
    pub players: Vec<Player>,
}

impl MatchHeader {
    #[must_use]
    pub fn player_by_username(&self, username: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.username == username)
    }

    /// Players assigned to the given team, in list order.
    pub fn team_players(&self, team: TeamIndex) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(move |p| p.team_index == team)
    }

    /// The team with the higher score, `None` on a tie.
    #[must_use]
    pub fn winning_team(&self) -> Option<TeamIndex> {
        let [a, b] = &self.teams;
        match a.score.cmp(&b.score) {
            std::cmp::Ordering::Greater => Some(TeamIndex::ZERO),
            std::cmp::Ordering::Less => Some(TeamIndex::ONE),
            std::cmp::Ordering::Equal => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn sample() -> MatchHeader {
        MatchHeader {
            game_version: "Y9S1".into(),
            code_version: 7_422_506,
            timestamp: Utc.with_ymd_and_hms(2024, 3, 9, 20, 15, 0).unwrap(),
            match_type: MatchType(8),
            map: MapId(1_604_642_924),
            game_mode: GameMode(2_838_806_006),
            recording_player_id: "2".into(),
            recording_profile_id: "rec".into(),
            additional_tags: String::new(),
            rounds_per_match: 9,
            rounds_per_match_overtime: 3,
            round_number: 4,
            overtime_round_number: 0,
            playlist_category: None,
            match_id: "m-1".into(),
            teams: [
                Team {
                    name: "BLUE".into(),
                    score: 3,
                },
                Team {
                    name: "ORANGE".into(),
                    score: 1,
                },
            ],
            gm_settings: vec![1, 2],
            players: vec![
                Player::from_identity("Ash".into(), "p1".into(), TeamIndex::ZERO),
                Player::from_identity("Thermite".into(), "p2".into(), TeamIndex::ONE),
                Player::from_identity("Sledge".into(), "p3".into(), TeamIndex::ZERO),
            ],
        }
    }

    #[test]
    fn finds_player_by_username() {
        let h = sample();
        assert_eq!(h.player_by_username("Thermite").unwrap().profile_id, "p2");
        assert!(h.player_by_username("Nobody").is_none());
    }

    #[test]
    fn team_players_filters_by_index() {
        let h = sample();
        let names: Vec<_> = h
            .team_players(TeamIndex::ZERO)
            .map(|p| p.username.as_str())
            .collect();
        assert_eq!(names, ["Ash", "Sledge"]);
    }

    #[test]
    fn winning_team_and_tie() {
        let mut h = sample();
        assert_eq!(h.winning_team(), Some(TeamIndex::ZERO));
        h.teams[1].score = 3;
        assert_eq!(h.winning_team(), None);
    }

    #[test]
    fn serializes_timestamp_and_skips_missing_playlist() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["timestamp"], "2024-03-09T20:15:00Z");
        assert!(json.get("playlist_category").is_none());
        assert_eq!(json["teams"][1]["name"], "ORANGE");
    }
}
