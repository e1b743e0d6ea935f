//! Named text encodings used by [`ByteBuffer`](crate::ByteBuffer).
//!
//! Every encoding is a pair of conversions: [`Codec::encode`] turns text into
//! bytes, [`Codec::decode`] turns bytes back into text. The set is fixed:
//!
//! | encoding   | aliases                  | width                      |
//! |------------|--------------------------|----------------------------|
//! | `ascii`    |                          | 1 byte, high bit stripped  |
//! | `utf8`     | `utf-8`                  | 1–4 bytes                  |
//! | `utf16le`  | `utf-16le`, `ucs2`, `ucs-2` | 2 or 4 bytes            |
//! | `base64`   |                          | 4 chars per 3 bytes        |
//! | `latin1`   | `binary`                 | 1 byte                     |
//! | `hex`      |                          | 2 chars per byte           |
//!
//! Names are matched ASCII case-insensitively.
//!
//! ```
//! use bufevent::Encoding;
//!
//! let enc: Encoding = "UCS-2".parse().unwrap();
//! assert_eq!(enc, Encoding::Utf16Le);
//! assert_eq!(Encoding::Hex.decode(b"hi"), "6869");
//! assert_eq!(Encoding::Base64.encode("aGk="), b"hi");
//! ```

mod base64;
mod hex;
mod utf16;

use alloc::{
    borrow::ToOwned,
    string::{String, ToString},
    vec::Vec,
};
use core::{fmt, str::FromStr};

use bstr::ByteSlice;

use crate::error::BufferError;

/// A text encoding: converts text to bytes and back.
///
/// `decode(encode(text)) == text` holds for any text the encoding can
/// represent. Decoding never fails; bytes that do not form valid text are
/// replaced or dropped according to the encoding's rules.
pub trait Codec {
    /// Canonical lower-case name.
    fn name(&self) -> &'static str;

    /// Convert `text` to bytes.
    fn encode(&self, text: &str) -> Vec<u8>;

    /// Convert `bytes` to text.
    fn decode(&self, bytes: &[u8]) -> String;

    /// Number of bytes `encode(text)` would produce.
    fn byte_length(&self, text: &str) -> usize {
        self.encode(text).len()
    }
}

/// 7-bit ASCII. The high bit is stripped in both directions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ascii;

impl Codec for Ascii {
    fn name(&self) -> &'static str {
        "ascii"
    }

    fn encode(&self, text: &str) -> Vec<u8> {
        text.encode_utf16().map(|unit| (unit & 0x7f) as u8).collect()
    }

    fn decode(&self, bytes: &[u8]) -> String {
        bytes.iter().map(|b| char::from(b & 0x7f)).collect()
    }

    fn byte_length(&self, text: &str) -> usize {
        text.encode_utf16().count()
    }
}

/// UTF-8. Invalid sequences decode to U+FFFD, one per maximal invalid
/// subpart.
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8;

impl Codec for Utf8 {
    fn name(&self) -> &'static str {
        "utf8"
    }

    fn encode(&self, text: &str) -> Vec<u8> {
        text.as_bytes().to_vec()
    }

    fn decode(&self, bytes: &[u8]) -> String {
        bytes.to_str_lossy().into_owned()
    }

    fn byte_length(&self, text: &str) -> usize {
        text.len()
    }
}

/// ISO-8859-1: one byte per UTF-16 code unit, keeping the low byte.
#[derive(Debug, Clone, Copy, Default)]
pub struct Latin1;

impl Codec for Latin1 {
    fn name(&self) -> &'static str {
        "latin1"
    }

    fn encode(&self, text: &str) -> Vec<u8> {
        text.encode_utf16().map(|unit| (unit & 0xff) as u8).collect()
    }

    fn decode(&self, bytes: &[u8]) -> String {
        bytes.iter().copied().map(char::from).collect()
    }

    fn byte_length(&self, text: &str) -> usize {
        text.encode_utf16().count()
    }
}

pub use self::{base64::Base64, hex::Hex, utf16::Utf16Le};

/// The fixed registry of encodings understood by
/// [`ByteBuffer`](crate::ByteBuffer).
///
/// # Default
///
/// [`Encoding::Utf8`], which is also what an omitted encoding name resolves
/// to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    /// `ascii`
    Ascii,
    /// `utf8`, `utf-8`
    #[default]
    Utf8,
    /// `utf16le`, `utf-16le`, `ucs2`, `ucs-2`
    Utf16Le,
    /// `base64`
    Base64,
    /// `latin1`, `binary`
    Latin1,
    /// `hex`
    Hex,
}

impl Encoding {
    /// Every encoding, in table order.
    pub const ALL: [Encoding; 6] = [
        Encoding::Ascii,
        Encoding::Utf8,
        Encoding::Utf16Le,
        Encoding::Base64,
        Encoding::Latin1,
        Encoding::Hex,
    ];

    /// Canonical name.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.codec().name()
    }

    /// Alternative names accepted by [`Encoding::lookup`].
    #[must_use]
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Encoding::Ascii | Encoding::Base64 | Encoding::Hex => &[],
            Encoding::Utf8 => &["utf-8"],
            Encoding::Utf16Le => &["utf-16le", "ucs2", "ucs-2"],
            Encoding::Latin1 => &["binary"],
        }
    }

    /// Resolve a name or alias, ignoring ASCII case.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|enc| {
            enc.name().eq_ignore_ascii_case(name)
                || enc.aliases().iter().any(|a| a.eq_ignore_ascii_case(name))
        })
    }

    /// Whether `name` names a supported encoding.
    #[must_use]
    pub fn is_encoding(name: &str) -> bool {
        Self::lookup(name).is_some()
    }

    /// Resolve an optional encoding argument. An omitted name means
    /// [`Encoding::Utf8`]; an unknown one is an error.
    ///
    /// # Errors
    ///
    /// [`BufferError::UnsupportedEncoding`] when `name` is `Some` and unknown.
    pub fn resolve(name: Option<&str>) -> Result<Self, BufferError> {
        name.map_or(Ok(Encoding::Utf8), str::parse::<Encoding>)
    }

    /// The codec implementing this encoding.
    #[must_use]
    pub fn codec(self) -> &'static dyn Codec {
        match self {
            Encoding::Ascii => &Ascii,
            Encoding::Utf8 => &Utf8,
            Encoding::Utf16Le => &Utf16Le,
            Encoding::Base64 => &Base64,
            Encoding::Latin1 => &Latin1,
            Encoding::Hex => &Hex,
        }
    }

    /// Shorthand for `self.codec().encode(text)`.
    #[must_use]
    pub fn encode(self, text: &str) -> Vec<u8> {
        self.codec().encode(text)
    }

    /// Shorthand for `self.codec().decode(bytes)`.
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> String {
        self.codec().decode(bytes)
    }

    /// Number of bytes `text` occupies in this encoding.
    #[must_use]
    pub fn byte_length(self, text: &str) -> usize {
        self.codec().byte_length(text)
    }
}

impl FromStr for Encoding {
    type Err = BufferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s).ok_or_else(|| BufferError::UnsupportedEncoding(s.to_owned()))
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Encoding> for String {
    fn from(enc: Encoding) -> Self {
        enc.name().to_string()
    }
}
