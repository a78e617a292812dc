// Frame-by-frame zstd decompression for dissect files.
//
// The recorder writes the replay as a run of zstd frames and may leave
// bytes that are not zstd after the last one. A plain multi-frame decoder
// would fail on those bytes, so frames are opened one at a time and the
// stream ends cleanly at the first non-frame boundary.

use std::io::{self, BufRead, Read};

use crate::error::DecodeError;

/// Magic number opening every regular zstd frame.
pub const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// Skippable frames use `0x184D2A50..=0x184D2A5F`.
const SKIPPABLE_MAGIC_MASK: u32 = 0xFFFF_FFF0;
const SKIPPABLE_MAGIC: u32 = 0x184D_2A50;

const PEEK_BUFFER_SIZE: usize = 64 * 1024;

fn is_frame_magic(bytes: &[u8]) -> bool {
    let Some(head) = bytes.get(..4) else {
        return false;
    };
    if head == ZSTD_MAGIC {
        return true;
    }
    let word = u32::from_le_bytes([head[0], head[1], head[2], head[3]]);
    word & SKIPPABLE_MAGIC_MASK == SKIPPABLE_MAGIC
}

/// Open a compressed dissect stream.
///
/// # Errors
///
/// - [`DecodeError::InvalidFormat`] if the input does not start with a
///   zstd frame.
/// - [`DecodeError::Io`] if the input cannot be read.
pub fn open<R: Read>(reader: R) -> Result<FrameReader<R>, DecodeError> {
    let mut source = PeekReader::new(reader);
    if !is_frame_magic(source.peek(4)?) {
        return Err(DecodeError::InvalidFormat {
            reason: "input is not zstd-compressed",
        });
    }
    Ok(FrameReader {
        state: FrameState::Between(source),
        frames: 0,
    })
}

/// Decompressed view over a sequence of zstd frames.
pub struct FrameReader<R: Read> {
    state: FrameState<R>,
    frames: usize,
}

enum FrameState<R: Read> {
    Frame(zstd::stream::read::Decoder<'static, PeekReader<R>>),
    Between(PeekReader<R>),
    Done,
}

impl<R: Read> FrameReader<R> {
    /// Number of frames opened so far.
    #[must_use]
    pub fn frames(&self) -> usize {
        self.frames
    }
}

impl<R: Read> Read for FrameReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            match std::mem::replace(&mut self.state, FrameState::Done) {
                FrameState::Frame(mut decoder) => {
                    let n = decoder.read(buf)?;
                    if n > 0 {
                        self.state = FrameState::Frame(decoder);
                        return Ok(n);
                    }
                    self.state = FrameState::Between(decoder.finish());
                }
                FrameState::Between(mut source) => {
                    let head = source.peek(4)?;
                    if head.is_empty() {
                        return Ok(0);
                    }
                    if !is_frame_magic(head) {
                        tracing::debug!(
                            frames = self.frames,
                            "non-zstd data after last frame, ending stream"
                        );
                        return Ok(0);
                    }
                    let decoder = zstd::stream::read::Decoder::with_buffer(source)?.single_frame();
                    self.frames += 1;
                    self.state = FrameState::Frame(decoder);
                }
                FrameState::Done => return Ok(0),
            }
        }
    }
}

/// Buffered reader that can look ahead a few bytes without consuming
/// them, even across a refill boundary.
struct PeekReader<R> {
    inner: R,
    buf: Box<[u8]>,
    pos: usize,
    filled: usize,
}

impl<R: Read> PeekReader<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            buf: vec![0u8; PEEK_BUFFER_SIZE].into_boxed_slice(),
            pos: 0,
            filled: 0,
        }
    }

    /// Up to `n` unread bytes; fewer only at end of input.
    fn peek(&mut self, n: usize) -> io::Result<&[u8]> {
        if self.filled - self.pos < n {
            self.buf.copy_within(self.pos..self.filled, 0);
            self.filled -= self.pos;
            self.pos = 0;
            while self.filled < n {
                match self.inner.read(&mut self.buf[self.filled..]) {
                    Ok(0) => break,
                    Ok(read) => self.filled += read,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                    Err(e) => return Err(e),
                }
            }
        }
        let end = self.filled.min(self.pos + n);
        Ok(&self.buf[self.pos..end])
    }
}

impl<R: Read> Read for PeekReader<R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = available.len().min(out.len());
        out[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

impl<R: Read> BufRead for PeekReader<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.pos == self.filled {
            self.pos = 0;
            self.filled = loop {
                match self.inner.read(&mut self.buf) {
                    Ok(n) => break n,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                    Err(e) => return Err(e),
                }
            };
        }
        Ok(&self.buf[self.pos..self.filled])
    }

    fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.filled);
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn compress(data: &[u8]) -> Vec<u8> {
        zstd::encode_all(Cursor::new(data), 3).unwrap()
    }

    fn read_all<R: Read>(mut r: R) -> Vec<u8> {
        let mut out = Vec::new();
        r.read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn rejects_non_zstd_input() {
        let result = open(Cursor::new(b"dissect but not compressed".to_vec()));
        assert!(matches!(result, Err(DecodeError::InvalidFormat { .. })));
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(
            open(Cursor::new(Vec::new())),
            Err(DecodeError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn decodes_single_frame() {
        let reader = open(Cursor::new(compress(b"dissect payload"))).unwrap();
        assert_eq!(read_all(reader), b"dissect payload");
    }

    #[test]
    fn concatenates_frames() {
        let mut file = compress(b"first ");
        file.extend(compress(b"second"));
        let mut reader = open(Cursor::new(file)).unwrap();
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"first second");
        assert_eq!(reader.frames(), 2);
    }

    #[test]
    fn stops_cleanly_at_trailing_garbage() {
        let mut file = compress(b"only frame");
        file.extend_from_slice(b"\x01\x02\x03\x04 not a frame");
        let reader = open(Cursor::new(file)).unwrap();
        assert_eq!(read_all(reader), b"only frame");
    }

    #[test]
    fn skippable_magic_is_recognised() {
        assert!(is_frame_magic(&[0x50, 0x2A, 0x4D, 0x18]));
        assert!(is_frame_magic(&[0x5F, 0x2A, 0x4D, 0x18]));
        assert!(!is_frame_magic(&[0x60, 0x2A, 0x4D, 0x18]));
        assert!(!is_frame_magic(&[0x28, 0xB5]));
    }

    #[test]
    fn peek_across_refill_boundary() {
        let data: Vec<u8> = (0..=255u8).cycle().take(PEEK_BUFFER_SIZE + 10).collect();
        let mut r = PeekReader::new(Cursor::new(data.clone()));
        let mut sink = vec![0u8; PEEK_BUFFER_SIZE - 2];
        r.read_exact(&mut sink).unwrap();
        assert_eq!(r.peek(4).unwrap(), &data[PEEK_BUFFER_SIZE - 2..PEEK_BUFFER_SIZE + 2]);
        let mut rest = Vec::new();
        r.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, &data[PEEK_BUFFER_SIZE - 2..]);
    }
}
