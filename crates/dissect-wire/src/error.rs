/// Byte-level errors raised while reading the decompressed dissect stream.
///
/// Every variant that can be tied to a position carries the absolute
/// offset into the decompressed stream where the read stopped.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The source ran out in the middle of a fixed-size read.
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEof { offset: usize },

    /// The source ran out while searching for a byte pattern.
    ///
    /// Kept apart from [`WireError::UnexpectedEof`] so the player scanner
    /// can read it as "no more records" instead of a truncated stream.
    #[error("pattern not found before end of input (offset {offset})")]
    PatternNotFound { offset: usize },

    /// The 7 bytes between a header string's length and its payload were
    /// not the expected separator.
    #[error("invalid string separator at offset {offset}: {found:02X?}")]
    InvalidSeparator { offset: usize, found: [u8; 7] },

    /// The underlying source failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// `PatternNotFound` and `UnexpectedEof` both mean "the source returned 0".
// What separates them is the operation that was running: a `seek` has no
// length promise, so reaching the end is an answer, while a `read(n)`
// promised `n` bytes and breaking that promise is corruption.
// `Io` is neither: the source itself broke, and a seek that hits it must
// not pretend the pattern was simply absent.
