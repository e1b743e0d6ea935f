use alloc::{string::String, vec::Vec};

use ::base64::{
    Engine,
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig, general_purpose::STANDARD},
};

use super::Codec;

/// Reads unpadded, padded, and non-canonical final quanta alike.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Base64 with the standard alphabet.
///
/// Output is always padded. Input is read leniently: the URL-safe `-` and `_`
/// are accepted, characters outside the alphabet (whitespace included) are
/// skipped, and decoding stops at the first `=`. Trailing bits that do not
/// complete a byte are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64;

/// Map `text` onto the standard alphabet, up to the first `=`.
fn normalize(text: &str) -> Vec<u8> {
    let mut out: Vec<u8> = text
        .bytes()
        .take_while(|&c| c != b'=')
        .filter_map(|c| match c {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'+' | b'/' => Some(c),
            b'-' => Some(b'+'),
            b'_' => Some(b'/'),
            _ => None,
        })
        .collect();
    // A lone final sextet cannot complete a byte.
    if out.len() % 4 == 1 {
        out.pop();
    }
    out
}

impl Codec for Base64 {
    fn name(&self) -> &'static str {
        "base64"
    }

    fn encode(&self, text: &str) -> Vec<u8> {
        LENIENT.decode(normalize(text)).unwrap_or_default()
    }

    fn decode(&self, bytes: &[u8]) -> String {
        STANDARD.encode(bytes)
    }
}
