//! String literal escaping and unescaping for JSONX syntax.
//!
//! This module converts between:
//! - Runtime strings (e.g., "hello\n" with an actual newline character)
//! - JSONX source string literals (e.g., "hello\n" with a backslash-n sequence)

use bumpalo::Bump;
use core::fmt;
use thiserror::Error;

/// Errors that can occur when unescaping string literals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnescapeError {
    #[error("invalid escape sequence '{seq}' at position {pos}")]
    InvalidEscape { pos: usize, seq: String },

    #[error("invalid hex digit in '{seq}' at position {pos}")]
    InvalidHexDigit { pos: usize, seq: String },

    #[error("incomplete escape at position {pos}: expected {expected} digits, got {got}")]
    IncompleteEscape {
        pos: usize,
        expected: usize,
        got: usize,
    },

    #[error("invalid Unicode scalar value U+{value:X} at position {pos}")]
    InvalidUnicodeScalar { pos: usize, value: u32 },
}

/// Write `s` as a double-quoted JSONX string literal, quotes included.
pub fn escape_string(f: &mut impl fmt::Write, s: &str) -> fmt::Result {
    f.write_char('"')?;
    for ch in s.chars() {
        match ch {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            '\0' => f.write_str("\\0")?,
            c if c.is_control() => write!(f, "\\u{:04x}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

/// Read exactly `count` hex digits from `chars`.
fn hex_digits(
    chars: &mut core::iter::Peekable<core::str::CharIndices<'_>>,
    count: usize,
    pos: usize,
    prefix: &str,
) -> Result<u32, UnescapeError> {
    let mut value = 0u32;
    for got in 0..count {
        match chars.next() {
            Some((_, ch)) => match ch.to_digit(16) {
                Some(digit) => value = (value << 4) | digit,
                None => {
                    return Err(UnescapeError::InvalidHexDigit {
                        pos,
                        seq: format!("{}{}", prefix, ch),
                    });
                }
            },
            None => {
                return Err(UnescapeError::IncompleteEscape {
                    pos,
                    expected: count,
                    got,
                });
            }
        }
    }
    Ok(value)
}

/// Unescape the contents of a quoted string literal (quotes already stripped).
///
/// Supported escapes: `\n \r \t \b \f \v \0 \\ \' \" \` \$ \/`, `\xNN`,
/// `\uNNNN`, `\u{N..}` and line continuation (`\` followed by a newline).
/// Inputs without backslashes are returned as-is without copying.
///
/// # Example
///
/// ```ignore
/// let arena = Bump::new();
/// let result = unescape_string(&arena, r"hello\nworld").unwrap();
/// assert_eq!(result, "hello\nworld");
/// ```
pub fn unescape_string<'a>(arena: &'a Bump, input: &'a str) -> Result<&'a str, UnescapeError> {
    if !input.contains('\\') {
        return Ok(input);
    }

    let mut output = String::with_capacity(input.len());
    let mut chars = input.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        if ch != '\\' {
            output.push(ch);
            continue;
        }

        let escaped = match chars.next() {
            Some((_, 'n')) => '\n',
            Some((_, 'r')) => '\r',
            Some((_, 't')) => '\t',
            Some((_, 'b')) => '\u{8}',
            Some((_, 'f')) => '\u{c}',
            Some((_, 'v')) => '\u{b}',
            Some((_, '0')) => '\0',
            Some((_, c @ ('\\' | '\'' | '"' | '`' | '$' | '/'))) => c,
            Some((_, '\n')) => continue,
            Some((_, '\r')) => {
                if let Some((_, '\n')) = chars.peek() {
                    chars.next();
                }
                continue;
            }
            Some((_, 'x')) => {
                let value = hex_digits(&mut chars, 2, pos, "\\x")?;
                // Two hex digits always fit in Latin-1.
                char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER)
            }
            Some((_, 'u')) => {
                let value = if let Some((_, '{')) = chars.peek() {
                    chars.next();
                    let mut value = 0u32;
                    let mut digits = 0;
                    loop {
                        match chars.next() {
                            Some((_, '}')) if digits > 0 => break,
                            Some((_, c)) => match c.to_digit(16) {
                                Some(d) if digits < 6 => {
                                    value = (value << 4) | d;
                                    digits += 1;
                                }
                                _ => {
                                    return Err(UnescapeError::InvalidHexDigit {
                                        pos,
                                        seq: format!("\\u{{{}", c),
                                    });
                                }
                            },
                            None => {
                                return Err(UnescapeError::IncompleteEscape {
                                    pos,
                                    expected: 1,
                                    got: digits,
                                });
                            }
                        }
                    }
                    value
                } else {
                    hex_digits(&mut chars, 4, pos, "\\u")?
                };
                char::from_u32(value)
                    .ok_or(UnescapeError::InvalidUnicodeScalar { pos, value })?
            }
            Some((_, other)) => {
                return Err(UnescapeError::InvalidEscape {
                    pos,
                    seq: format!("\\{}", other),
                });
            }
            None => {
                return Err(UnescapeError::InvalidEscape {
                    pos,
                    seq: "\\".to_string(),
                });
            }
        };
        output.push(escaped);
    }

    Ok(arena.alloc_str(&output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn escape(s: &str) -> String {
        let mut output = String::new();
        escape_string(&mut output, s).unwrap();
        output
    }

    fn unescape(s: &str) -> Result<String, UnescapeError> {
        let arena = Bump::new();
        let input = arena.alloc_str(s);
        unescape_string(&arena, input).map(|s| s.to_string())
    }

    #[test]
    fn test_escape_empty() {
        assert_eq!(escape(""), r#""""#);
    }

    #[test]
    fn test_escape_common_escapes() {
        assert_eq!(escape("hello\nworld"), r#""hello\nworld""#);
        assert_eq!(escape("back\\slash"), r#""back\\slash""#);
        assert_eq!(escape("bell\u{7}"), r#""bell\u0007""#);
    }

    #[test]
    fn test_escape_quotes() {
        assert_eq!(escape(r#"say "hi""#), r#""say \"hi\"""#);
        assert_eq!(escape("it's"), r#""it's""#);
    }

    #[test]
    fn test_unescape_fast_path() {
        let arena = Bump::new();
        let input = arena.alloc_str("plain text");
        let result = unescape_string(&arena, input).unwrap();
        assert_eq!(result.as_ptr(), input.as_ptr());
    }

    #[test]
    fn test_unescape_simple_escapes() {
        assert_eq!(unescape(r"a\nb\tc").unwrap(), "a\nb\tc");
        assert_eq!(unescape(r#"\"\'\`\\"#).unwrap(), "\"'`\\");
        assert_eq!(unescape(r"\$\{x}").unwrap_err(), UnescapeError::InvalidEscape {
            pos: 2,
            seq: "\\{".to_string(),
        });
    }

    #[test]
    fn test_unescape_unicode() {
        assert_eq!(unescape(r"café").unwrap(), "café");
        assert_eq!(unescape(r"\u{1F600}").unwrap(), "😀");
        assert_eq!(unescape(r"\x41").unwrap(), "A");
    }

    #[test]
    fn test_unescape_line_continuation() {
        assert_eq!(unescape("one \\\ntwo").unwrap(), "one two");
    }

    #[test]
    fn test_unescape_errors() {
        assert_eq!(
            unescape(r"\q"),
            Err(UnescapeError::InvalidEscape {
                pos: 0,
                seq: "\\q".to_string()
            })
        );
        assert_eq!(
            unescape(r"\u12"),
            Err(UnescapeError::IncompleteEscape {
                pos: 0,
                expected: 4,
                got: 2
            })
        );
        assert_eq!(
            unescape(r"\uD800"),
            Err(UnescapeError::InvalidUnicodeScalar {
                pos: 0,
                value: 0xD800
            })
        );
        assert!(matches!(
            unescape(r"\xZZ"),
            Err(UnescapeError::InvalidHexDigit { pos: 0, .. })
        ));
    }
}
