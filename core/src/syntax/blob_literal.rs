/// Blob literal decoding and formatting for JSONX syntax.
///
/// Converts between runtime bytes and the two blob literal forms:
/// - `b16'deadbeef'` (hex, two digits per byte)
/// - `b64'3q2+7w=='` (standard base64 alphabet with padding)
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use core::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlobError {
    #[error("invalid hex blob: {0}")]
    Hex(String),

    #[error("invalid base64 blob: {0}")]
    Base64(String),
}

pub fn is_b16_char(ch: char) -> bool {
    ch.is_ascii_hexdigit()
}

pub fn is_b64_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '+' | '/' | '=')
}

pub fn decode_b16(text: &str) -> Result<Vec<u8>, BlobError> {
    hex::decode(text).map_err(|e| BlobError::Hex(e.to_string()))
}

pub fn decode_b64(text: &str) -> Result<Vec<u8>, BlobError> {
    STANDARD
        .decode(text)
        .map_err(|e| BlobError::Base64(e.to_string()))
}

/// Write `bytes` as a `b16'...'` literal.
pub fn escape_blob(f: &mut impl fmt::Write, bytes: &[u8]) -> fmt::Result {
    f.write_str("b16'")?;
    for byte in bytes {
        write!(f, "{:02x}", byte)?;
    }
    f.write_char('\'')
}
