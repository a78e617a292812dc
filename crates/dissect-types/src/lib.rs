#![warn(clippy::pedantic)]

pub mod ids;
pub mod match_header;
pub mod player;

pub use ids::{GameMode, MapId, MatchType};
pub use match_header::{MatchHeader, Team};
pub use player::{Player, TeamIndex};
