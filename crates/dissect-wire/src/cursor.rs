use std::io::{ErrorKind, Read};

use crate::error::WireError;
use crate::pattern::Pattern;

/// Forward-only reader over a decompressed dissect stream.
///
/// `ByteCursor` owns the byte source for the duration of one decode and
/// counts every byte it pulls from it. There is no way to move backwards:
/// [`seek`](Self::seek) searches forward and consumes what it skips.
///
/// ```text
///   source ──► ByteCursor ──► read(n) / read_array / skip
///                  │
///                  └──► seek(pattern)   consumes up to and including
///                                       the first match
///   offset: total bytes consumed, never decreases
/// ```
///
/// Reads are issued straight to the source, so wrap unbuffered readers
/// in a [`std::io::BufReader`] first; `seek` pulls one byte at a time.
pub struct ByteCursor<R> {
    inner: R,
    offset: usize,
}

impl<R: Read> ByteCursor<R> {
    /// Wrap a byte source. The offset starts at 0.
    pub fn new(inner: R) -> Self {
        Self { inner, offset: 0 }
    }

    /// Number of bytes consumed so far.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Read exactly `n` bytes.
    ///
    /// # Errors
    ///
    /// - [`WireError::UnexpectedEof`] if the source ends first. The offset
    ///   still reflects the bytes that were consumed before the end.
    /// - [`WireError::Io`] if the source fails.
    pub fn read(&mut self, n: usize) -> Result<Vec<u8>, WireError> {
        let mut buf = vec![0u8; n];
        self.fill(&mut buf)?;
        Ok(buf)
    }

    /// Read exactly `N` bytes into a fixed-size array.
    ///
    /// # Errors
    ///
    /// Same as [`read`](Self::read).
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], WireError> {
        let mut buf = [0u8; N];
        self.fill(&mut buf)?;
        Ok(buf)
    }

    /// Read a single byte.
    ///
    /// # Errors
    ///
    /// Same as [`read`](Self::read).
    pub fn read_u8(&mut self) -> Result<u8, WireError> {
        self.next_byte()?
            .ok_or(WireError::UnexpectedEof { offset: self.offset })
    }

    /// Discard exactly `n` bytes.
    ///
    /// # Errors
    ///
    /// Same as [`read`](Self::read).
    pub fn skip(&mut self, n: usize) -> Result<(), WireError> {
        let mut scratch = [0u8; 64];
        let mut left = n;
        while left > 0 {
            let step = left.min(scratch.len());
            self.fill(&mut scratch[..step])?;
            left -= step;
        }
        Ok(())
    }

    /// Consume bytes until the most recent `pattern.len()` bytes equal
    /// `pattern`.
    ///
    /// On success the offset sits just past the match.
    ///
    /// # Errors
    ///
    /// - [`WireError::PatternNotFound`] if the source ends before a match.
    /// - [`WireError::Io`] if the source fails mid-search.
    pub fn seek(&mut self, pattern: &Pattern) -> Result<(), WireError> {
        let mut matched = 0;
        while let Some(byte) = self.next_byte()? {
            matched = pattern.step(matched, byte);
            if matched == pattern.len() {
                return Ok(());
            }
        }
        Err(WireError::PatternNotFound {
            offset: self.offset,
        })
    }

    /// Pull one byte, `None` on a clean end of input.
    fn next_byte(&mut self) -> Result<Option<u8>, WireError> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.offset += 1;
                    return Ok(Some(byte[0]));
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(WireError::Io(e)),
            }
        }
    }

    /// Fill `buf` completely, counting partial progress into the offset.
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), WireError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(WireError::UnexpectedEof {
                        offset: self.offset,
                    });
                }
                Ok(n) => {
                    filled += n;
                    self.offset += n;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(WireError::Io(e)),
            }
        }
        Ok(())
    }
}
