/// A byte pattern prepared for incremental forward search.
///
/// The search never looks ahead: bytes are fed one at a time through
/// [`Pattern::step`], and the pattern tracks how many of the most recent
/// bytes match a prefix of itself. The `fallback` table is the classic
/// prefix function, so a mismatch drops to the longest prefix that is
/// still a suffix of what was read instead of back to zero.
///
/// ```text
///   pattern   22 95 1C 16 50 08
///   fallback   0  0  0  0  0  0
///
///   pattern   01 01 02
///   fallback   0  1  0      ← "01 01 01 02" still matches
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    bytes: Vec<u8>,
    fallback: Vec<usize>,
}

impl Pattern {
    /// Build a pattern and its fallback table.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is empty. Every marker in the format is a
    /// non-empty constant.
    #[must_use]
    pub fn new(bytes: &[u8]) -> Self {
        assert!(!bytes.is_empty(), "search pattern must not be empty");

        let mut fallback = vec![0usize; bytes.len()];
        let mut k = 0;
        for i in 1..bytes.len() {
            while k > 0 && bytes[i] != bytes[k] {
                k = fallback[k - 1];
            }
            if bytes[i] == bytes[k] {
                k += 1;
            }
            fallback[i] = k;
        }

        Self {
            bytes: bytes.to_vec(),
            fallback,
        }
    }

    /// The raw bytes being searched for.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Pattern length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always `false`; patterns cannot be empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Advance the automaton by one byte.
    ///
    /// `matched` is the number of trailing bytes read so far that match a
    /// prefix of the pattern. Returns the new count; a return value equal
    /// to [`len`](Self::len) means the full pattern was just completed.
    #[must_use]
    pub fn step(&self, mut matched: usize, byte: u8) -> usize {
        if matched == self.bytes.len() {
            matched = self.fallback[matched - 1];
        }
        while matched > 0 && self.bytes[matched] != byte {
            matched = self.fallback[matched - 1];
        }
        if self.bytes[matched] == byte {
            matched += 1;
        }
        matched
    }
}

impl From<&[u8]> for Pattern {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes)
    }
}

impl<const N: usize> From<&[u8; N]> for Pattern {
    fn from(bytes: &[u8; N]) -> Self {
        Self::new(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find_end(pattern: &Pattern, haystack: &[u8]) -> Option<usize> {
        let mut matched = 0;
        for (i, &b) in haystack.iter().enumerate() {
            matched = pattern.step(matched, b);
            if matched == pattern.len() {
                return Some(i + 1);
            }
        }
        None
    }

    #[test]
    fn fallback_table_for_distinct_bytes_is_zero() {
        let p = Pattern::new(&[0x22, 0x95, 0x1C, 0x16, 0x50, 0x08]);
        assert_eq!(p.fallback, vec![0; 6]);
    }

    #[test]
    fn fallback_table_for_repeating_prefix() {
        let p = Pattern::new(b"abab");
        assert_eq!(p.fallback, vec![0, 0, 1, 2]);
    }

    #[test]
    fn finds_pattern_after_partial_overlap() {
        let p = Pattern::new(&[1, 1, 2]);
        assert_eq!(find_end(&p, &[1, 1, 1, 2]), Some(4));
    }

    #[test]
    fn finds_pattern_at_start() {
        let p = Pattern::new(b"dis");
        assert_eq!(find_end(&p, b"dissect"), Some(3));
    }

    #[test]
    fn no_match_returns_none() {
        let p = Pattern::new(&[0x8A, 0x50, 0x9B, 0xD0]);
        assert_eq!(find_end(&p, &[0x8A, 0x50, 0x9B, 0x00, 0x50]), None);
    }

    #[test]
    fn single_byte_pattern() {
        let p = Pattern::new(&[0x07]);
        assert_eq!(find_end(&p, &[0, 0, 7]), Some(3));
    }

    #[test]
    fn step_continues_after_full_match() {
        let p = Pattern::new(b"aa");
        let mut m = 0;
        m = p.step(m, b'a');
        m = p.step(m, b'a');
        assert_eq!(m, 2);
        m = p.step(m, b'a');
        assert_eq!(m, 2);
    }

    #[test]
    #[should_panic(expected = "must not be empty")]
    fn empty_pattern_panics() {
        let _ = Pattern::new(&[]);
    }
}
