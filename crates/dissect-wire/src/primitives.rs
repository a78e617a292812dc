use std::io::Read;

use crate::cursor::ByteCursor;
use crate::error::WireError;

/// The 7 bytes sitting between a header string's length byte and its
/// payload.
pub const STRING_SEPARATOR: [u8; 7] = [0x00; 7];

/// Fixed-width and length-prefixed decoders layered on [`ByteCursor`].
///
/// The format uses two string framings and they must not be mixed up:
///
/// ```text
///   header string  ┌─────┬──────────────────────┬─────────────┐
///                  │ len │ separator (7 × 0x00) │ len bytes   │
///                  └─────┴──────────────────────┴─────────────┘
///
///   body string    ┌─────┬─────────────┐
///                  │ len │ len bytes   │
///                  └─────┴─────────────┘
/// ```
///
/// Payload bytes are returned raw; text conversion is the caller's call.
impl<R: Read> ByteCursor<R> {
    /// Read a 4-byte little-endian signed integer.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] or [`WireError::Io`].
    pub fn read_int(&mut self) -> Result<i32, WireError> {
        Ok(i32::from_le_bytes(self.read_array::<4>()?))
    }

    /// Read a header-region string: length, separator, payload.
    ///
    /// # Errors
    ///
    /// - [`WireError::InvalidSeparator`] if the 7 bytes after the length
    ///   are not [`STRING_SEPARATOR`]; the stream is out of sync.
    /// - [`WireError::UnexpectedEof`] or [`WireError::Io`].
    pub fn read_header_string(&mut self) -> Result<Vec<u8>, WireError> {
        let len = self.read_u8()?;
        let sep_offset = self.offset();
        let sep = self.read_array::<7>()?;
        if sep != STRING_SEPARATOR {
            return Err(WireError::InvalidSeparator {
                offset: sep_offset,
                found: sep,
            });
        }
        self.read(usize::from(len))
    }

    /// Read a body-region string: length, payload.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] or [`WireError::Io`].
    pub fn read_string(&mut self) -> Result<Vec<u8>, WireError> {
        let len = self.read_u8()?;
        self.read(usize::from(len))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn cursor(bytes: &[u8]) -> ByteCursor<Cursor<Vec<u8>>> {
        ByteCursor::new(Cursor::new(bytes.to_vec()))
    }

    fn header_string(s: &str) -> Vec<u8> {
        let mut out = vec![u8::try_from(s.len()).unwrap()];
        out.extend_from_slice(&STRING_SEPARATOR);
        out.extend_from_slice(s.as_bytes());
        out
    }

    #[test]
    fn read_int_little_endian() {
        let mut c = cursor(&[0x04, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(c.read_int().unwrap(), 4);
        assert_eq!(c.read_int().unwrap(), -1);
        assert_eq!(c.offset(), 8);
    }

    #[test]
    fn read_int_truncated() {
        let mut c = cursor(&[0x01, 0x02]);
        assert!(matches!(
            c.read_int(),
            Err(WireError::UnexpectedEof { offset: 2 })
        ));
    }

    #[test]
    fn header_string_with_separator() {
        let mut bytes = header_string("version");
        bytes.extend(header_string("Y9S1"));
        let mut c = cursor(&bytes);
        assert_eq!(c.read_header_string().unwrap(), b"version");
        assert_eq!(c.read_header_string().unwrap(), b"Y9S1");
        assert_eq!(c.offset(), bytes.len());
    }

    #[test]
    fn header_string_empty_payload() {
        let mut c = cursor(&header_string(""));
        assert!(c.read_header_string().unwrap().is_empty());
        assert_eq!(c.offset(), 8);
    }

    #[test]
    fn header_string_rejects_bad_separator() {
        let mut bytes = vec![3, 0, 0, 0, 1, 0, 0, 0];
        bytes.extend_from_slice(b"abc");
        let mut c = cursor(&bytes);
        let err = c.read_header_string().unwrap_err();
        assert!(matches!(
            err,
            WireError::InvalidSeparator {
                offset: 1,
                found: [0, 0, 0, 1, 0, 0, 0]
            }
        ));
    }

    #[test]
    fn header_string_keeps_non_utf8_bytes() {
        let mut bytes = vec![2];
        bytes.extend_from_slice(&STRING_SEPARATOR);
        bytes.extend_from_slice(&[0xFF, 0xFE]);
        let mut c = cursor(&bytes);
        assert_eq!(c.read_header_string().unwrap(), vec![0xFF, 0xFE]);
    }

    #[test]
    fn body_string_has_no_separator() {
        let mut c = cursor(&[5, b'S', b'l', b'e', b'd', b'g', 0xAA]);
        assert_eq!(c.read_string().unwrap(), b"Sledg");
        assert_eq!(c.offset(), 6);
    }

    #[test]
    fn body_string_read_as_header_string_fails() {
        // A body string followed by ordinary data is not a header string.
        let mut c = cursor(&[2, b'h', b'i', 1, 2, 3, 4, 5, 6, 7]);
        assert!(matches!(
            c.read_header_string(),
            Err(WireError::InvalidSeparator { .. })
        ));
    }

    #[test]
    fn body_string_truncated() {
        let mut c = cursor(&[10, b'a', b'b']);
        assert!(matches!(
            c.read_string(),
            Err(WireError::UnexpectedEof { offset: 3 })
        ));
    }
}
