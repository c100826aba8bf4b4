//! Byte-level UTF-8 scanner.
//!
//! Walks a byte slice one code point at a time, forward and backward, with
//! cheap save/restore for backtracking. Decoding is strict: malformed input
//! is reported with the offending offset, never replaced.

use thiserror::Error;

/// Malformed UTF-8 found while scanning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid UTF-8 lead byte 0x{byte:02x} at offset {offset}")]
    InvalidLeadByte { offset: usize, byte: u8 },

    #[error("truncated UTF-8 sequence at offset {offset}")]
    Truncated { offset: usize },

    #[error("invalid UTF-8 continuation byte 0x{byte:02x} at offset {offset}")]
    InvalidContinuation { offset: usize, byte: u8 },

    #[error("invalid code point U+{value:X} at offset {offset}")]
    InvalidCodePoint { offset: usize, value: u32 },
}

impl DecodeError {
    pub fn offset(&self) -> usize {
        match self {
            DecodeError::InvalidLeadByte { offset, .. }
            | DecodeError::Truncated { offset }
            | DecodeError::InvalidContinuation { offset, .. }
            | DecodeError::InvalidCodePoint { offset, .. } => *offset,
        }
    }
}

/// Saved scanner position, see [`Utf8Scanner::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark(usize);

#[derive(Debug, Clone)]
pub struct Utf8Scanner<'a> {
    bytes: &'a [u8],
    begin: usize,
    end: usize,
    at: usize,
}

#[inline]
fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

impl<'a> Utf8Scanner<'a> {
    /// Scan the whole slice.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self::with_range(bytes, 0, bytes.len())
    }

    /// Scan `bytes[begin..end]`. Out of range bounds are clamped to the slice.
    ///
    /// The cursor starts at the first code-point boundary at or after `begin`.
    pub fn with_range(bytes: &'a [u8], begin: usize, end: usize) -> Self {
        let end = end.min(bytes.len());
        let begin = begin.min(end);
        let mut at = begin;
        while at < end && is_continuation(bytes[at]) {
            at += 1;
        }
        Self {
            bytes,
            begin,
            end,
            at,
        }
    }

    /// Byte offset of the cursor.
    pub fn offset(&self) -> usize {
        self.at
    }

    pub fn is_start(&self) -> bool {
        self.at <= self.begin
    }

    pub fn is_end(&self) -> bool {
        self.at >= self.end
    }

    /// The code point under the cursor, or `None` at the end.
    pub fn current(&self) -> Result<Option<char>, DecodeError> {
        if self.at >= self.end {
            return Ok(None);
        }
        self.decode_at(self.at).map(Some)
    }

    /// Move to the next code-point boundary. No-op at the end.
    pub fn advance(&mut self) {
        if self.at >= self.end {
            return;
        }
        self.at += 1;
        while self.at < self.end && is_continuation(self.bytes[self.at]) {
            self.at += 1;
        }
    }

    /// Move to the previous code-point boundary. No-op at the beginning.
    pub fn retreat(&mut self) {
        if self.at <= self.begin {
            return;
        }
        self.at -= 1;
        while self.at > self.begin && is_continuation(self.bytes[self.at]) {
            self.at -= 1;
        }
    }

    pub fn save(&self) -> Mark {
        Mark(self.at)
    }

    pub fn restore(&mut self, mark: Mark) {
        self.at = mark.0.clamp(self.begin, self.end);
    }

    /// Consume `expected` if it is the current code point.
    pub fn eat(&mut self, expected: char) -> Result<bool, DecodeError> {
        if self.current()? == Some(expected) {
            self.advance();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Consume `text` if the input continues with it, otherwise leave the
    /// cursor where it was.
    pub fn eat_str(&mut self, text: &str) -> Result<bool, DecodeError> {
        let mark = self.save();
        for expected in text.chars() {
            if !self.eat(expected)? {
                self.restore(mark);
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Look at the code point after the current one without moving.
    pub fn peek_next(&mut self) -> Result<Option<char>, DecodeError> {
        let mark = self.save();
        self.advance();
        let next = self.current();
        self.restore(mark);
        next
    }

    fn decode_at(&self, pos: usize) -> Result<char, DecodeError> {
        let b0 = self.bytes[pos];
        let (mut cp, len, min) = match b0 {
            0x00..=0x7F => return Ok(b0 as char),
            _ if b0 & 0xE0 == 0xC0 => ((b0 & 0x1F) as u32, 2, 0x80),
            _ if b0 & 0xF0 == 0xE0 => ((b0 & 0x0F) as u32, 3, 0x800),
            _ if b0 & 0xF8 == 0xF0 => ((b0 & 0x07) as u32, 4, 0x1_0000),
            _ => {
                return Err(DecodeError::InvalidLeadByte {
                    offset: pos,
                    byte: b0,
                });
            }
        };

        if pos + len > self.end {
            return Err(DecodeError::Truncated { offset: pos });
        }
        for i in 1..len {
            let bx = self.bytes[pos + i];
            if !is_continuation(bx) {
                return Err(DecodeError::InvalidContinuation {
                    offset: pos + i,
                    byte: bx,
                });
            }
            cp = (cp << 6) | (bx & 0x3F) as u32;
        }

        // Overlong forms and surrogates would not survive `str` validation.
        if cp < min {
            return Err(DecodeError::InvalidCodePoint {
                offset: pos,
                value: cp,
            });
        }
        char::from_u32(cp).ok_or(DecodeError::InvalidCodePoint {
            offset: pos,
            value: cp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn collect(bytes: &[u8]) -> Result<Vec<char>, DecodeError> {
        let mut scanner = Utf8Scanner::new(bytes);
        let mut out = Vec::new();
        while let Some(ch) = scanner.current()? {
            out.push(ch);
            scanner.advance();
        }
        Ok(out)
    }

    #[test]
    fn test_ascii_and_multibyte() {
        assert_eq!(
            collect("aé€😀".as_bytes()).unwrap(),
            vec!['a', 'é', '€', '😀']
        );
    }

    #[test]
    fn test_empty_input_is_end() {
        let scanner = Utf8Scanner::new(b"");
        assert!(scanner.is_end());
        assert!(scanner.is_start());
        assert_eq!(scanner.current().unwrap(), None);
    }

    #[test]
    fn test_advance_and_retreat_are_noops_at_bounds() {
        let mut scanner = Utf8Scanner::new("é".as_bytes());
        scanner.retreat();
        assert_eq!(scanner.offset(), 0);
        scanner.advance();
        assert_eq!(scanner.offset(), 2);
        assert!(scanner.is_end());
        scanner.advance();
        assert_eq!(scanner.offset(), 2);
        scanner.retreat();
        assert_eq!(scanner.offset(), 0);
        assert_eq!(scanner.current().unwrap(), Some('é'));
    }

    #[test]
    fn test_retreat_skips_continuation_bytes() {
        let mut scanner = Utf8Scanner::new("a😀b".as_bytes());
        scanner.advance();
        scanner.advance();
        assert_eq!(scanner.current().unwrap(), Some('b'));
        scanner.retreat();
        assert_eq!(scanner.offset(), 1);
        assert_eq!(scanner.current().unwrap(), Some('😀'));
    }

    #[test]
    fn test_range_starts_on_boundary() {
        let bytes = "é!".as_bytes();
        // Offset 1 is in the middle of `é`.
        let scanner = Utf8Scanner::with_range(bytes, 1, bytes.len());
        assert_eq!(scanner.offset(), 2);
        assert_eq!(scanner.current().unwrap(), Some('!'));
    }

    #[test]
    fn test_save_restore() {
        let mut scanner = Utf8Scanner::new(b"null");
        let mark = scanner.save();
        assert!(!scanner.eat_str("nil").unwrap());
        assert_eq!(scanner.save(), mark);
        assert!(scanner.eat_str("nu").unwrap());
        assert_eq!(scanner.offset(), 2);
        scanner.restore(mark);
        assert_eq!(scanner.current().unwrap(), Some('n'));
    }

    #[test]
    fn test_peek_next_does_not_move() {
        let mut scanner = Utf8Scanner::new(b"/*");
        assert_eq!(scanner.peek_next().unwrap(), Some('*'));
        assert_eq!(scanner.current().unwrap(), Some('/'));
    }

    #[test]
    fn test_invalid_lead_byte() {
        assert_eq!(
            collect(&[b'a', 0xFF]),
            Err(DecodeError::InvalidLeadByte {
                offset: 1,
                byte: 0xFF
            })
        );
    }

    #[test]
    fn test_truncated_sequence() {
        assert_eq!(collect(&[0xE2, 0x82]), Err(DecodeError::Truncated { offset: 0 }));
    }

    #[test]
    fn test_invalid_continuation() {
        assert_eq!(
            collect(&[0xC3, b'a']),
            Err(DecodeError::InvalidContinuation {
                offset: 1,
                byte: b'a'
            })
        );
    }

    #[test]
    fn test_overlong_and_surrogate_rejected() {
        assert!(matches!(
            collect(&[0xC0, 0xAF]),
            Err(DecodeError::InvalidCodePoint { offset: 0, .. })
        ));
        assert!(matches!(
            collect(&[0xED, 0xA0, 0x80]),
            Err(DecodeError::InvalidCodePoint { offset: 0, .. })
        ));
    }

    #[test]
    fn test_error_offset() {
        let err = collect(&[b'x', b'y', 0xE0, b'z', b'w']).unwrap_err();
        assert_eq!(err.offset(), 3);
    }
}
