#![warn(clippy::pedantic)]

pub mod cursor;
pub mod error;
pub mod markers;
pub mod pattern;
pub mod primitives;

pub use cursor::ByteCursor;
pub use error::WireError;
pub use pattern::Pattern;
pub use primitives::STRING_SEPARATOR;
