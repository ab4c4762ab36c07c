//! ISO-8859-1 transcoding for header text.
//!
//! The convention requires header text to be representable as raw bytes,
//! one byte per character. Code points above U+00FF cannot cross the
//! boundary and are rejected on encode; decode always succeeds.

use crate::app::GantryError;
use bytes::Bytes;

/// Decode raw header bytes; every byte maps to the char with the same
/// code point.
pub fn latin1_decode(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Encode header text back to raw bytes. Fails with a protocol-usage
/// error on any character outside U+0000..=U+00FF.
pub fn latin1_encode(text: &str) -> Result<Bytes, GantryError> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        let code = c as u32;
        if code > 0xFF {
            return Err(GantryError::protocol(format!(
                "header text not representable in a single-byte encoding: {:?}",
                c
            )));
        }
        out.push(code as u8);
    }
    Ok(Bytes::from(out))
}
