use alloc::{string::String, vec::Vec};

use super::Codec;

/// UTF-16, little-endian. Code points at or above U+10000 take a surrogate
/// pair.
///
/// Decoding ignores a trailing odd byte. Unpaired surrogates cannot live in a
/// Rust `String` and decode to U+FFFD.
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf16Le;

impl Codec for Utf16Le {
    fn name(&self) -> &'static str {
        "utf16le"
    }

    fn encode(&self, text: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(text.len() * 2);
        for unit in text.encode_utf16() {
            out.extend_from_slice(&unit.to_le_bytes());
        }
        out
    }

    fn decode(&self, bytes: &[u8]) -> String {
        let units = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]));
        char::decode_utf16(units)
            .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
    }

    fn byte_length(&self, text: &str) -> usize {
        text.encode_utf16().count() * 2
    }
}
