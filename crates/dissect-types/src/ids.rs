use serde::Serialize;

// Raw enumerated ids from the match header. Turning these into names
// (map titles, mode labels) needs a lookup table that changes every
// season, so the decoder stops at the integer.

/// Match type id (`matchtype` header property).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MatchType(pub u64);

/// Map id (`worldid` header property).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MapId(pub u64);

/// Game mode id (`gamemodeid` header property).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct GameMode(pub u64);

macro_rules! raw_id_impls {
    ($($ty:ident),*) => {
        $(
            impl $ty {
                /// The raw id as stored in the file.
                #[must_use]
                pub fn raw(self) -> u64 {
                    self.0
                }
            }

            impl From<u64> for $ty {
                fn from(raw: u64) -> Self {
                    Self(raw)
                }
            }

            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "{}", self.0)
                }
            }
        )*
    };
}

raw_id_impls!(MatchType, MapId, GameMode);
