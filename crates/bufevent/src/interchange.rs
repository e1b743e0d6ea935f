//! The structured interchange form of a [`ByteBuffer`]:
//! `{"type":"Buffer","data":[1,2,3]}`.
//!
//! With the `serde` feature, [`BufferJson`] and [`ByteBuffer`] itself
//! serialize to and deserialize from that shape, so a buffer embedded in a
//! larger document survives a round trip through any serde format.

use alloc::vec::Vec;

use crate::buffer::ByteBuffer;

/// Tag identifying the interchange record. There is only one kind.
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonKind {
    /// Serialized as the string `"Buffer"`.
    #[default]
    Buffer,
}

/// `{ type: "Buffer", data: [..] }`, as produced by
/// [`ByteBuffer::to_json`].
///
/// ```
/// use bufevent::{BufferJson, ByteBuffer, JsonKind};
///
/// let json = ByteBuffer::from_array([1, 2, 3]).to_json();
/// assert_eq!(json.kind, JsonKind::Buffer);
/// assert_eq!(json.data, [1, 2, 3]);
/// assert_eq!(ByteBuffer::from_json(&json).to_vec(), [1, 2, 3]);
/// ```
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferJson {
    /// Always [`JsonKind::Buffer`].
    #[cfg_attr(any(test, feature = "serde"), serde(rename = "type"))]
    pub kind: JsonKind,
    /// The bytes, in order.
    pub data: Vec<u8>,
}

impl BufferJson {
    /// Wrap `data` in an interchange record.
    #[must_use]
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            kind: JsonKind::Buffer,
            data,
        }
    }
}

impl From<&ByteBuffer> for BufferJson {
    fn from(buf: &ByteBuffer) -> Self {
        buf.to_json()
    }
}

impl From<BufferJson> for ByteBuffer {
    fn from(json: BufferJson) -> Self {
        ByteBuffer::from_vec(json.data)
    }
}

#[cfg(any(test, feature = "serde"))]
impl serde::Serialize for ByteBuffer {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde::Serialize::serialize(&self.to_json(), serializer)
    }
}

#[cfg(any(test, feature = "serde"))]
impl<'de> serde::Deserialize<'de> for ByteBuffer {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <BufferJson as serde::Deserialize>::deserialize(deserializer).map(ByteBuffer::from)
    }
}
