use alloc::{string::String, vec::Vec};

use super::Codec;

/// Two lowercase hexadecimal digits per byte.
///
/// Input digits may be either case. Parsing stops at the first pair that is
/// not valid hex, and a trailing unpaired digit is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hex;

impl Codec for Hex {
    fn name(&self) -> &'static str {
        "hex"
    }

    fn encode(&self, text: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(text.len() / 2);
        let mut byte = [0u8; 1];
        for pair in text.as_bytes().chunks_exact(2) {
            if ::hex::decode_to_slice(pair, &mut byte).is_err() {
                break;
            }
            out.push(byte[0]);
        }
        out
    }

    fn decode(&self, bytes: &[u8]) -> String {
        ::hex::encode(bytes)
    }
}
