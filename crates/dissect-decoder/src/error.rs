use dissect_wire::WireError;

/// Errors that can occur while decoding a dissect file.
///
/// ```text
///   DecodeError
///   ├── InvalidFormat          ← not zstd, or no "dissect" magic
///   ├── MissingProperty        ← required header key never appeared
///   ├── InvalidInteger         ← header value is not the expected integer
///   ├── InvalidTimestamp       ← datetime not YYYY-MM-DD-HH-MM-SS
///   ├── InvalidTeamIndex       ← player "team" outside 0..=1
///   ├── Wire(WireError)        ← EOF, bad separator, pattern not found
///   └── Io(std::io::Error)     ← source failed before the cursor existed
/// ```
///
/// Nothing is retried and nothing is partially returned: any of these
/// ends the decode.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The input is not a dissect file.
    ///
    /// Raised when the compressed stream does not open with a zstd frame,
    /// or when the decompressed stream does not open with `dissect`.
    #[error("not a dissect file: {reason}")]
    InvalidFormat { reason: &'static str },

    /// A header property needed to build the match header was absent.
    #[error("header property {key:?} missing")]
    MissingProperty { key: &'static str },

    /// A header property held something other than the expected integer.
    #[error("header property {key:?} has invalid integer value {value:?}")]
    InvalidInteger {
        key: String,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// The `datetime` property did not follow `YYYY-MM-DD-HH-MM-SS`.
    #[error("invalid timestamp {value:?}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// A player record named a team other than 0 or 1.
    #[error("player team index {value} out of range (expected 0 or 1)")]
    InvalidTeamIndex { value: i64 },

    /// Byte-level failure from the cursor.
    #[error(transparent)]
    Wire(#[from] WireError),

    /// I/O failure while opening the compressed stream.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    /// True when a marker search ran off the end of the stream.
    ///
    /// Only the search for the next team marker may end this way; the
    /// player scanner reads it as "no more identity records".
    #[must_use]
    pub fn is_end_of_records(&self) -> bool {
        matches!(self, Self::Wire(WireError::PatternNotFound { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_pattern_not_found_ends_records() {
        assert!(DecodeError::Wire(WireError::PatternNotFound { offset: 9 }).is_end_of_records());
        assert!(!DecodeError::Wire(WireError::UnexpectedEof { offset: 9 }).is_end_of_records());
        assert!(
            !DecodeError::Wire(WireError::Io(std::io::Error::other("x"))).is_end_of_records()
        );
        assert!(!DecodeError::InvalidFormat { reason: "x" }.is_end_of_records());
    }

    #[test]
    fn invalid_integer_names_key_and_value() {
        let source = "abc".parse::<i64>().unwrap_err();
        let err = DecodeError::InvalidInteger {
            key: "code".into(),
            value: "abc".into(),
            source,
        };
        assert_eq!(
            err.to_string(),
            "header property \"code\" has invalid integer value \"abc\""
        );
    }

    #[test]
    fn wire_errors_convert_transparently() {
        let err: DecodeError = WireError::UnexpectedEof { offset: 42 }.into();
        assert_eq!(
            err.to_string(),
            WireError::UnexpectedEof { offset: 42 }.to_string()
        );
    }
}
