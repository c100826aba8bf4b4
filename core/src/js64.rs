//! js64: an identifier-safe binary-to-text encoding.
//!
//! Bytes are packed six bits at a time into an alphabet made only of legal
//! bare-identifier characters, behind a leading `$`, so that an encoded
//! digest can be used verbatim as a binding name or object key.
//!
//! The byte stream is read as a little-endian bit pipe: the low bits of each
//! byte are emitted first. The leading `$` stands for a zero-valued 6-bit
//! prefix.

use lazy_static::lazy_static;
use thiserror::Error;

/// Legal ASCII identifier characters, in ASCII order. Index 0 is the sentinel.
pub const ALPHABET: &[u8; 64] =
    b"$0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz";

pub const SENTINEL: char = '$';

const INVALID: u8 = 0xFF;

lazy_static! {
    static ref DECODE_TABLE: [u8; 128] = {
        let mut table = [INVALID; 128];
        for (index, &symbol) in ALPHABET.iter().enumerate() {
            table[symbol as usize] = index as u8;
        }
        table
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("empty js64 text")]
    Empty,

    #[error("js64 text must start with '$'")]
    MissingSentinel,

    #[error("invalid js64 symbol at offset {offset}")]
    InvalidSymbol { offset: usize },
}

/// Number of characters `encode` produces for `len` input bytes.
pub fn encoded_len(len: usize) -> usize {
    (len * 4).div_ceil(3) + 1
}

pub fn encode(bytes: &[u8]) -> String {
    let symbols = (bytes.len() * 4).div_ceil(3);
    let mut out = String::with_capacity(symbols + 1);

    let mut code: u32 = 0;
    let mut bits: u32 = 6;
    let mut next = 0;
    for _ in 0..=symbols {
        out.push(ALPHABET[(code & 0x3F) as usize] as char);
        code >>= 6;
        bits -= 6;
        if bits < 6 {
            // Past the end the pipe is padded with zero bits.
            let byte = bytes.get(next).copied().unwrap_or(0);
            code |= (byte as u32) << bits;
            bits += 8;
            next += 1;
        }
    }
    out
}

pub fn decode(text: &str) -> Result<Vec<u8>, FormatError> {
    let bytes = text.as_bytes();
    match bytes.first() {
        None => return Err(FormatError::Empty),
        Some(&b'$') => {}
        Some(_) => return Err(FormatError::MissingSentinel),
    }

    let symbols = &bytes[1..];
    let mut out = Vec::with_capacity(symbols.len() * 3 / 4);
    let mut code: u32 = 0;
    let mut bits: u32 = 0;
    for (i, &symbol) in symbols.iter().enumerate() {
        let value = DECODE_TABLE
            .get(symbol as usize)
            .copied()
            .unwrap_or(INVALID);
        if value == INVALID {
            return Err(FormatError::InvalidSymbol { offset: i + 1 });
        }
        code |= (value as u32) << bits;
        bits += 6;
        if bits >= 8 {
            out.push((code & 0xFF) as u8);
            code >>= 8;
            bits -= 8;
        }
    }
    Ok(out)
}

/// Whether `text` is well-formed js64.
pub fn is_js64(text: &str) -> bool {
    decode(text).is_ok()
}
