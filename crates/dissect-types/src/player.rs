use serde::Serialize;

/// Which of the two teams a player is on. Only 0 and 1 exist.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TeamIndex(u8);

impl TeamIndex {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(1);

    /// Accepts 0 or 1, anything else is `None`.
    #[must_use]
    pub fn new(raw: i64) -> Option<Self> {
        match raw {
            0 => Some(Self::ZERO),
            1 => Some(Self::ONE),
            _ => None,
        }
    }

    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Index into `MatchHeader::teams`.
    #[must_use]
    pub fn as_usize(self) -> usize {
        usize::from(self.0)
    }
}

/// One participant in the match.
///
/// Players come from two places in the file. The header's player records
/// fill `id`, `username`, `team_index` and the hero/role fields; the
/// post-header identity records fill `username`, `profile_id` and
/// `team_index`. A player only seen in the identity records keeps `id`
/// empty and every optional field `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Player {
    pub id: String,
    pub profile_id: String,
    pub username: String,
    pub team_index: TeamIndex,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_name: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alliance: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_image: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_portrait: Option<i64>,
}

impl Player {
    /// A player known only from an identity record.
    #[must_use]
    pub fn from_identity(username: String, profile_id: String, team_index: TeamIndex) -> Self {
        Self {
            username,
            profile_id,
            team_index,
            ..Self::default()
        }
    }
}
