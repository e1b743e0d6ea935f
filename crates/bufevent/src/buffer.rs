//! A fixed-length byte container that either owns its bytes or aliases a
//! window of another buffer's bytes.
//!
//! Storage is reference counted and never resized. A *view* (from
//! [`ByteBuffer::slice`] or [`ByteBuffer::from_bytes`]) points into the same
//! storage as its source: writes through either side are visible through the
//! other. Nothing guards against that sharing; it is the contract.
//!
//! ```
//! use bufevent::{ByteBuffer, Encoding};
//!
//! let buf = ByteBuffer::from_string("runoob", Encoding::Utf8);
//! let head = buf.slice(0..2);
//! head.set(0, b'R').unwrap();
//! assert_eq!(head.to_string(), "Ru");
//! assert_eq!(buf.to_string(), "Runoob");
//! ```

use alloc::{format, rc::Rc, string::String, vec, vec::Vec};
use core::{
    cell::RefCell,
    cmp::Ordering,
    fmt,
    ops::{Bound, RangeBounds},
};

use crate::{
    codec::Encoding,
    coerce::ByteValue,
    error::BufferError,
    interchange::BufferJson,
};

/// Largest length a single buffer may have.
pub const MAX_LENGTH: usize = 0x7fff_ffff;

/// Number of bytes [`fmt::Debug`] prints before summarising the rest.
pub const INSPECT_MAX_BYTES: usize = 50;

pub(crate) type Storage = Rc<RefCell<Vec<u8>>>;

/// Raw bytes with codec-aware text conversion.
///
/// `len` counts bytes, never characters: `"我"` is one character but three
/// UTF-8 bytes.
///
/// Buffers are single-threaded (`!Send`, `!Sync`). Equality and ordering
/// compare contents byte by byte.
pub struct ByteBuffer {
    storage: Storage,
    offset: usize,
    len: usize,
    view: bool,
}

/// Validate a requested size, rejecting negative and oversized values.
pub(crate) fn checked_size<S>(size: S) -> Result<usize, BufferError>
where
    S: TryInto<usize> + Copy + fmt::Display,
{
    let Ok(n) = size.try_into() else {
        return Err(BufferError::InvalidArgument(format!(
            "size must be a non-negative integer, received {size}"
        )));
    };
    if n > MAX_LENGTH {
        return Err(BufferError::InvalidArgument(format!(
            "size {n} exceeds the maximum buffer length {MAX_LENGTH}"
        )));
    }
    Ok(n)
}

/// Resolve `range` against `len` without clamping. An unbounded end is `len`.
fn raw_bounds(range: &impl RangeBounds<usize>, len: usize) -> (usize, usize) {
    let start = match range.start_bound() {
        Bound::Included(&s) => s,
        Bound::Excluded(&s) => s.saturating_add(1),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&e) => e.saturating_add(1),
        Bound::Excluded(&e) => e,
        Bound::Unbounded => len,
    };
    (start, end)
}

/// Resolve `range` against `len`, clamping both ends into `0..=len`. An
/// inverted range becomes empty.
fn clamped_bounds(range: &impl RangeBounds<usize>, len: usize) -> (usize, usize) {
    let (start, end) = raw_bounds(range, len);
    let start = start.min(len);
    let end = end.min(len).max(start);
    (start, end)
}

/// Resolve `range` against `len`, failing if either end lies outside the
/// buffer.
fn checked_bounds(
    range: &impl RangeBounds<usize>,
    len: usize,
) -> Result<(usize, usize), BufferError> {
    let (start, end) = raw_bounds(range, len);
    if end > len {
        return Err(BufferError::range("end", format!("<= {len}"), end));
    }
    if start > end {
        return Err(BufferError::range("start", format!("<= {end}"), start));
    }
    Ok((start, end))
}

impl ByteBuffer {
    pub(crate) fn from_parts(storage: Storage, offset: usize, len: usize, view: bool) -> Self {
        debug_assert!(offset + len <= storage.borrow().len());
        Self {
            storage,
            offset,
            len,
            view,
        }
    }

    /// Take ownership of `bytes` without copying.
    #[must_use]
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        let len = bytes.len();
        Self::from_parts(Rc::new(RefCell::new(bytes)), 0, len, false)
    }

    /// A zero-filled buffer of `size` bytes.
    ///
    /// # Errors
    ///
    /// [`BufferError::InvalidArgument`] if `size` is negative or larger than
    /// [`MAX_LENGTH`].
    pub fn alloc<S>(size: S) -> Result<Self, BufferError>
    where
        S: TryInto<usize> + Copy + fmt::Display,
    {
        Self::alloc_filled(size, 0)
    }

    /// A buffer of `size` bytes, every byte set to `fill`.
    ///
    /// # Errors
    ///
    /// Same as [`ByteBuffer::alloc`].
    pub fn alloc_filled<S>(size: S, fill: u8) -> Result<Self, BufferError>
    where
        S: TryInto<usize> + Copy + fmt::Display,
    {
        let size = checked_size(size)?;
        Ok(Self::from_vec(vec![fill; size]))
    }

    /// A buffer of `size` bytes whose contents are **unspecified**.
    ///
    /// This is a dedicated allocation; the bytes happen to be zero today, but
    /// nothing promises that, so treat them as garbage. Callers must
    /// overwrite every byte (with [`ByteBuffer::fill`], [`ByteBuffer::write`]
    /// or [`ByteBuffer::copy`]) before reading it, and must never hand an
    /// unfilled buffer across a trust boundary. See
    /// [`BufferPool`](crate::BufferPool) for the pooled variant, where stale
    /// bytes from earlier users can show up.
    ///
    /// # Errors
    ///
    /// Same as [`ByteBuffer::alloc`].
    pub fn alloc_unsafe<S>(size: S) -> Result<Self, BufferError>
    where
        S: TryInto<usize> + Copy + fmt::Display,
    {
        let size = checked_size(size)?;
        Ok(Self::from_vec(vec![0; size]))
    }

    /// An owning buffer holding each value reduced to a byte.
    ///
    /// See [`ByteValue`] for the coercion rules.
    ///
    /// ```
    /// use bufevent::ByteBuffer;
    ///
    /// let buf = ByteBuffer::from_array([1, 2, 3, 256, -1]);
    /// assert_eq!(buf.to_vec(), [1, 2, 3, 0, 255]);
    /// ```
    pub fn from_array<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: ByteValue,
    {
        Self::from_vec(values.into_iter().map(|v| v.to_byte()).collect())
    }

    /// A view sharing `source`'s bytes in `offset..offset + length`.
    ///
    /// `length` defaults to the rest of `source`.
    ///
    /// # Errors
    ///
    /// [`BufferError::Range`] if `offset` or `length` reach past the end of
    /// `source`.
    pub fn from_bytes(
        source: &ByteBuffer,
        offset: usize,
        length: Option<usize>,
    ) -> Result<Self, BufferError> {
        if offset > source.len {
            return Err(BufferError::range(
                "offset",
                format!("<= {}", source.len),
                offset,
            ));
        }
        let available = source.len - offset;
        let length = length.unwrap_or(available);
        if length > available {
            return Err(BufferError::range(
                "length",
                format!("<= {available}"),
                length,
            ));
        }
        Ok(Self::from_parts(
            Rc::clone(&source.storage),
            source.offset + offset,
            length,
            true,
        ))
    }

    /// An owning deep copy of `other`'s current bytes.
    #[must_use]
    pub fn from_buffer(other: &ByteBuffer) -> Self {
        Self::from_vec(other.to_vec())
    }

    /// An owning buffer holding `text` encoded with `encoding`.
    #[must_use]
    pub fn from_string(text: &str, encoding: Encoding) -> Self {
        Self::from_vec(encoding.encode(text))
    }

    /// Like [`ByteBuffer::from_string`], with the encoding given by name.
    /// `None` means utf8.
    ///
    /// # Errors
    ///
    /// [`BufferError::UnsupportedEncoding`] for an unknown name.
    pub fn from_string_named(text: &str, encoding: Option<&str>) -> Result<Self, BufferError> {
        Ok(Self::from_string(text, Encoding::resolve(encoding)?))
    }

    /// Rebuild a buffer from its interchange form.
    #[must_use]
    pub fn from_json(json: &BufferJson) -> Self {
        Self::from_array(&json.data)
    }

    /// Concatenate `buffers` into a fresh owning buffer.
    ///
    /// ```
    /// use bufevent::ByteBuffer;
    ///
    /// let a = ByteBuffer::from("菜鸟教程");
    /// let b = ByteBuffer::from("www.runoob.com");
    /// let joined = ByteBuffer::concat([&a, &b]);
    /// assert_eq!(joined.len(), a.len() + b.len());
    /// assert_eq!(joined.to_string(), "菜鸟教程www.runoob.com");
    /// ```
    pub fn concat<'a, I>(buffers: I) -> Self
    where
        I: IntoIterator<Item = &'a ByteBuffer>,
    {
        let mut out = Vec::new();
        for buf in buffers {
            buf.with_bytes(|bytes| out.extend_from_slice(bytes));
        }
        Self::from_vec(out)
    }

    /// Concatenate `buffers`, then truncate or zero-pad to `total_length`.
    ///
    /// # Errors
    ///
    /// [`BufferError::InvalidArgument`] if `total_length` is negative or
    /// larger than [`MAX_LENGTH`].
    pub fn concat_with_length<'a, I, S>(buffers: I, total_length: S) -> Result<Self, BufferError>
    where
        I: IntoIterator<Item = &'a ByteBuffer>,
        S: TryInto<usize> + Copy + fmt::Display,
    {
        let total_length = checked_size(total_length)?;
        let mut out = Vec::with_capacity(total_length);
        for buf in buffers {
            if out.len() >= total_length {
                break;
            }
            buf.with_bytes(|bytes| out.extend_from_slice(bytes));
        }
        out.resize(total_length, 0);
        Ok(Self::from_vec(out))
    }

    /// Number of bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` if the buffer holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// `true` if this buffer aliases another buffer's storage.
    #[must_use]
    pub fn is_view(&self) -> bool {
        self.view
    }

    /// `true` if both buffers are backed by the same storage, whether or not
    /// their windows overlap.
    #[must_use]
    pub fn shares_storage(&self, other: &ByteBuffer) -> bool {
        Rc::ptr_eq(&self.storage, &other.storage)
    }

    #[cfg(any(test, feature = "fuzzing"))]
    /// Panic unless the window lies inside the backing storage.
    pub fn assert_invariants(&self) {
        let storage_len = self.storage.borrow().len();
        assert!(
            self.offset + self.len <= storage_len,
            "window {}..{} outside storage of {storage_len} bytes",
            self.offset,
            self.offset + self.len
        );
        assert!(self.len <= MAX_LENGTH, "length {} over MAX_LENGTH", self.len);
    }

    /// Run `f` over the visible bytes.
    ///
    /// # Panics
    ///
    /// If `f` mutates a buffer sharing this storage.
    pub fn with_bytes<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        let storage = self.storage.borrow();
        f(&storage[self.offset..self.offset + self.len])
    }

    /// Run `f` over the visible bytes, mutably. Changes show through every
    /// buffer sharing the storage.
    ///
    /// # Panics
    ///
    /// If `f` touches any buffer sharing this storage.
    pub fn with_bytes_mut<R>(&self, f: impl FnOnce(&mut [u8]) -> R) -> R {
        let mut storage = self.storage.borrow_mut();
        f(&mut storage[self.offset..self.offset + self.len])
    }

    /// Copy the visible bytes out.
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        self.with_bytes(<[u8]>::to_vec)
    }

    /// The byte at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<u8> {
        self.with_bytes(|bytes| bytes.get(index).copied())
    }

    /// Store `value` at `index`.
    ///
    /// # Errors
    ///
    /// [`BufferError::Range`] if `index >= len`.
    pub fn set(&self, index: usize, value: u8) -> Result<(), BufferError> {
        if index >= self.len {
            return Err(BufferError::range(
                "index",
                format!("< {}", self.len),
                index,
            ));
        }
        self.with_bytes_mut(|bytes| bytes[index] = value);
        Ok(())
    }

    /// Set every byte in `range` to `value`.
    ///
    /// # Errors
    ///
    /// [`BufferError::Range`] if `range` reaches past the end or is inverted.
    pub fn fill(&self, value: u8, range: impl RangeBounds<usize>) -> Result<&Self, BufferError> {
        let (start, end) = checked_bounds(&range, self.len)?;
        self.with_bytes_mut(|bytes| bytes[start..end].fill(value));
        Ok(self)
    }

    /// Fill `range` by repeating `pattern` encoded with `encoding`. The last
    /// repetition is cut short if it does not fit. An empty pattern fills
    /// with zeros.
    ///
    /// # Errors
    ///
    /// [`BufferError::Range`] as for [`ByteBuffer::fill`];
    /// [`BufferError::InvalidArgument`] if a non-empty `pattern` encodes to no
    /// bytes (such as `"zz"` as hex).
    pub fn fill_str(
        &self,
        pattern: &str,
        encoding: Encoding,
        range: impl RangeBounds<usize>,
    ) -> Result<&Self, BufferError> {
        let (start, end) = checked_bounds(&range, self.len)?;
        let encoded = encoding.encode(pattern);
        if encoded.is_empty() {
            if pattern.is_empty() {
                return self.fill(0, start..end);
            }
            return Err(BufferError::InvalidArgument(format!(
                "fill pattern {pattern:?} is empty once encoded as {encoding}"
            )));
        }
        self.with_bytes_mut(|bytes| {
            for (dst, src) in bytes[start..end].iter_mut().zip(encoded.iter().cycle()) {
                *dst = *src;
            }
        });
        Ok(self)
    }

    /// Encode `text` into the buffer at `offset` and return how many bytes
    /// were written.
    ///
    /// Text that does not fit is truncated, but never in the middle of a
    /// UTF-8 character or a UTF-16 code unit.
    ///
    /// ```
    /// use bufevent::{ByteBuffer, Encoding};
    ///
    /// let buf = ByteBuffer::alloc(256).unwrap();
    /// let written = buf.write("www.runoob.com", 0, Encoding::Utf8).unwrap();
    /// assert_eq!(written, 14);
    /// assert_eq!(buf.to_string_range(Encoding::Utf8, ..written), "www.runoob.com");
    /// ```
    ///
    /// # Errors
    ///
    /// [`BufferError::Range`] if `offset > len`.
    pub fn write(&self, text: &str, offset: usize, encoding: Encoding) -> Result<usize, BufferError> {
        if offset > self.len {
            return Err(BufferError::range(
                "offset",
                format!("<= {}", self.len),
                offset,
            ));
        }
        let available = self.len - offset;
        let encoded = encoding.encode(text);
        let written = match encoding {
            Encoding::Utf8 => {
                let mut n = encoded.len().min(available);
                while !text.is_char_boundary(n) {
                    n -= 1;
                }
                n
            }
            Encoding::Utf16Le => encoded.len().min(available) & !1,
            _ => encoded.len().min(available),
        };
        self.with_bytes_mut(|bytes| {
            bytes[offset..offset + written].copy_from_slice(&encoded[..written]);
        });
        Ok(written)
    }

    /// Decode the whole buffer with `encoding`.
    #[must_use]
    pub fn to_string_with(&self, encoding: Encoding) -> String {
        self.with_bytes(|bytes| encoding.decode(bytes))
    }

    /// Decode the bytes in `range` with `encoding`.
    ///
    /// Both ends are clamped to the buffer; an inverted range decodes to an
    /// empty string. Out-of-range indices never fail here.
    #[must_use]
    pub fn to_string_range(&self, encoding: Encoding, range: impl RangeBounds<usize>) -> String {
        let (start, end) = clamped_bounds(&range, self.len);
        self.with_bytes(|bytes| encoding.decode(&bytes[start..end]))
    }

    /// Decode `range` with the encoding given by name. `None` means utf8.
    ///
    /// # Errors
    ///
    /// [`BufferError::UnsupportedEncoding`] for an unknown name.
    pub fn to_string_named(
        &self,
        encoding: Option<&str>,
        range: impl RangeBounds<usize>,
    ) -> Result<String, BufferError> {
        Ok(self.to_string_range(Encoding::resolve(encoding)?, range))
    }

    /// The interchange form `{ type: "Buffer", data: [..] }`.
    #[must_use]
    pub fn to_json(&self) -> BufferJson {
        BufferJson::new(self.to_vec())
    }

    /// Lexicographic byte comparison. A proper prefix orders first.
    #[must_use]
    pub fn compare(&self, other: &ByteBuffer) -> Ordering {
        self.with_bytes(|a| other.with_bytes(|b| a.cmp(b)))
    }

    /// Copy this buffer's bytes in `source` into `target` starting at
    /// `target_start`, returning the number of bytes copied.
    ///
    /// The copy is truncated to the room left in `target`. Source and target
    /// may share storage and overlap; the result is as if the source bytes
    /// were first copied aside.
    ///
    /// ```
    /// use bufevent::ByteBuffer;
    ///
    /// let buf1 = ByteBuffer::from("abcdefghijkl");
    /// let buf2 = ByteBuffer::from("RUNOOB");
    /// assert_eq!(buf2.copy(&buf1, 2, ..).unwrap(), 6);
    /// assert_eq!(buf1.to_string(), "abRUNOOBijkl");
    /// ```
    ///
    /// # Errors
    ///
    /// [`BufferError::Range`] if the source range reaches past this buffer or
    /// `target_start` is past the end of `target`.
    pub fn copy(
        &self,
        target: &ByteBuffer,
        target_start: usize,
        source: impl RangeBounds<usize>,
    ) -> Result<usize, BufferError> {
        let (source_start, source_end) = raw_bounds(&source, self.len);
        if source_start > self.len {
            return Err(BufferError::range(
                "sourceStart",
                format!("<= {}", self.len),
                source_start,
            ));
        }
        if source_end > self.len {
            return Err(BufferError::range(
                "sourceEnd",
                format!("<= {}", self.len),
                source_end,
            ));
        }
        if target_start > target.len {
            return Err(BufferError::range(
                "targetStart",
                format!("<= {}", target.len),
                target_start,
            ));
        }
        if source_start >= source_end || target_start == target.len {
            return Ok(0);
        }

        let count = (source_end - source_start).min(target.len - target_start);
        let src = self.offset + source_start;
        let dst = target.offset + target_start;
        if self.shares_storage(target) {
            self.storage
                .borrow_mut()
                .copy_within(src..src + count, dst);
        } else {
            let from = self.storage.borrow();
            let mut to = target.storage.borrow_mut();
            to[dst..dst + count].copy_from_slice(&from[src..src + count]);
        }
        Ok(count)
    }

    /// A view over `range`, clamped to the buffer. No bytes are copied.
    #[must_use]
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Self {
        let (start, end) = clamped_bounds(&range, self.len);
        Self::from_parts(
            Rc::clone(&self.storage),
            self.offset + start,
            end - start,
            true,
        )
    }
}

impl PartialEq for ByteBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for ByteBuffer {}

impl PartialOrd for ByteBuffer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ByteBuffer {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl From<Vec<u8>> for ByteBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_vec(bytes)
    }
}

impl From<&[u8]> for ByteBuffer {
    fn from(bytes: &[u8]) -> Self {
        Self::from_vec(bytes.to_vec())
    }
}

impl From<&str> for ByteBuffer {
    fn from(text: &str) -> Self {
        Self::from_string(text, Encoding::Utf8)
    }
}

/// The bytes decoded as utf8.
impl fmt::Display for ByteBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_with(Encoding::Utf8))
    }
}

/// `<Buffer 68 65 6c 6c 6f>`, cut off after [`INSPECT_MAX_BYTES`].
impl fmt::Debug for ByteBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_bytes(|bytes| {
            f.write_str("<Buffer ")?;
            let shown = bytes.len().min(INSPECT_MAX_BYTES);
            for (i, b) in bytes[..shown].iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{b:02x}")?;
            }
            let remaining = bytes.len() - shown;
            if remaining > 0 {
                let plural = if remaining == 1 { "" } else { "s" };
                write!(f, " ... {remaining} more byte{plural}")?;
            }
            f.write_str(">")
        })
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use rstest::rstest;

    use super::*;

    #[test]
    fn alloc_zero_fills() {
        let buf = ByteBuffer::alloc(10).unwrap();
        assert_eq!(buf.len(), 10);
        assert_eq!(buf.to_vec(), [0; 10]);
        assert!(!buf.is_view());

        let ones = ByteBuffer::alloc_filled(10, 1).unwrap();
        assert_eq!(ones.to_vec(), [1; 10]);
    }

    #[rstest]
    #[case(-1_i64)]
    #[case(i64::MIN)]
    #[case(0x8000_0000_i64)]
    fn alloc_rejects_bad_sizes(#[case] size: i64) {
        assert!(matches!(
            ByteBuffer::alloc(size),
            Err(BufferError::InvalidArgument(_))
        ));
        assert!(matches!(
            ByteBuffer::alloc_unsafe(size),
            Err(BufferError::InvalidArgument(_))
        ));
    }

    #[test]
    fn alloc_unsafe_has_requested_length() {
        let buf = ByteBuffer::alloc_unsafe(10).unwrap();
        assert_eq!(buf.len(), 10);
        buf.fill(7, ..).unwrap();
        assert_eq!(buf.to_vec(), [7; 10]);
    }

    #[test]
    fn from_buffer_is_a_deep_copy() {
        let src = ByteBuffer::from("abc");
        let copy = ByteBuffer::from_buffer(&src);
        copy.set(0, b'x').unwrap();
        assert_eq!(src.to_string(), "abc");
        assert_eq!(copy.to_string(), "xbc");
        assert!(!copy.shares_storage(&src));
    }

    #[test]
    fn from_bytes_aliases_source() {
        let src = ByteBuffer::from("abcdef");
        let view = ByteBuffer::from_bytes(&src, 2, Some(3)).unwrap();
        assert!(view.is_view());
        assert_eq!(view.to_string(), "cde");

        view.set(0, b'C').unwrap();
        assert_eq!(src.to_string(), "abCdef");
        src.set(4, b'E').unwrap();
        assert_eq!(view.to_string(), "CdE");

        let rest = ByteBuffer::from_bytes(&src, 4, None).unwrap();
        assert_eq!(rest.to_string(), "Ef");
    }

    #[rstest]
    #[case(7, None)]
    #[case(2, Some(5))]
    #[case(6, Some(1))]
    fn from_bytes_rejects_out_of_range(#[case] offset: usize, #[case] length: Option<usize>) {
        let src = ByteBuffer::from("abcdef");
        assert!(matches!(
            ByteBuffer::from_bytes(&src, offset, length),
            Err(BufferError::Range { .. })
        ));
    }

    #[test]
    fn from_bytes_of_a_view_is_relative_to_the_view() {
        let src = ByteBuffer::from("0123456789");
        let view = src.slice(3..8);
        let inner = ByteBuffer::from_bytes(&view, 1, Some(2)).unwrap();
        assert_eq!(inner.to_string(), "45");
    }

    #[test]
    fn to_string_clamps_indices() {
        let buf = ByteBuffer::from_array((0..26).map(|i| i + 97));
        assert_eq!(
            buf.to_string_with(Encoding::Ascii),
            "abcdefghijklmnopqrstuvwxyz"
        );
        assert_eq!(buf.to_string_range(Encoding::Ascii, 0..5), "abcde");
        assert_eq!(buf.to_string_range(Encoding::Utf8, 0..5), "abcde");
        assert_eq!(buf.to_string_named(None, 0..5).unwrap(), "abcde");
        assert_eq!(buf.to_string_range(Encoding::Utf8, 24..100), "yz");
        assert_eq!(buf.to_string_range(Encoding::Utf8, 100..200), "");
        assert_eq!(buf.to_string_range(Encoding::Utf8, 5..2), "");
    }

    #[test]
    fn to_string_named_rejects_unknown_encoding() {
        let buf = ByteBuffer::from("x");
        assert_eq!(
            buf.to_string_named(Some("ebcdic"), ..),
            Err(BufferError::UnsupportedEncoding("ebcdic".into()))
        );
        assert!(ByteBuffer::from_string_named("x", Some("ebcdic")).is_err());
    }

    #[test]
    fn slice_is_a_clamped_view() {
        let buf = ByteBuffer::from("runoob");
        let head = buf.slice(0..2);
        assert!(head.is_view());
        assert_eq!(head.to_string(), "ru");

        assert_eq!(buf.slice(4..100).to_string(), "ob");
        assert!(buf.slice(10..).is_empty());
        assert!(buf.slice(4..1).is_empty());

        head.set(1, b'U').unwrap();
        assert_eq!(buf.to_string(), "rUnoob");
    }

    #[test]
    fn copy_truncates_to_target_room() {
        let src = ByteBuffer::from("RUNOOB");
        let dst = ByteBuffer::from("abcd");
        assert_eq!(src.copy(&dst, 2, ..).unwrap(), 2);
        assert_eq!(dst.to_string(), "abRU");
        assert_eq!(src.copy(&dst, 4, ..).unwrap(), 0);
        assert_eq!(src.copy(&dst, 0, 3..3).unwrap(), 0);
    }

    #[rstest]
    #[case(7, 8, 0)]
    #[case(0, 7, 0)]
    #[case(0, 6, 5)]
    fn copy_rejects_out_of_range(
        #[case] source_start: usize,
        #[case] source_end: usize,
        #[case] target_start: usize,
    ) {
        let src = ByteBuffer::from("RUNOOB");
        let dst = ByteBuffer::from("abcd");
        assert!(matches!(
            src.copy(&dst, target_start, source_start..source_end),
            Err(BufferError::Range { .. })
        ));
    }

    #[test]
    fn copy_within_one_buffer_handles_overlap() {
        let buf = ByteBuffer::from("abcdefgh");
        assert_eq!(buf.copy(&buf, 2, 0..6).unwrap(), 6);
        assert_eq!(buf.to_string(), "ababcdef");

        let buf = ByteBuffer::from("abcdefgh");
        assert_eq!(buf.copy(&buf, 0, 2..8).unwrap(), 6);
        assert_eq!(buf.to_string(), "cdefghgh");
    }

    #[test]
    fn copy_between_overlapping_views() {
        let buf = ByteBuffer::from("0123456789");
        let left = buf.slice(0..6);
        let right = buf.slice(3..10);
        assert_eq!(left.copy(&right, 0, ..).unwrap(), 6);
        assert_eq!(buf.to_string(), "0120123459");
    }

    #[test]
    fn fill_and_fill_str() {
        let buf = ByteBuffer::alloc(7).unwrap();
        buf.fill_str("abc", Encoding::Utf8, ..).unwrap();
        assert_eq!(buf.to_string(), "abcabca");
        buf.fill(b'-', 1..3).unwrap();
        assert_eq!(buf.to_string(), "a--abca");
        buf.fill_str("", Encoding::Utf8, 5..).unwrap();
        assert_eq!(buf.to_vec(), b"a--ab\0\0");
        assert!(matches!(
            buf.fill_str("zz", Encoding::Hex, ..),
            Err(BufferError::InvalidArgument(_))
        ));
        assert!(matches!(buf.fill(0, 2..9), Err(BufferError::Range { .. })));
    }

    #[test]
    fn write_never_splits_a_character() {
        let buf = ByteBuffer::alloc(4).unwrap();
        assert_eq!(buf.write("a我", 0, Encoding::Utf8).unwrap(), 4);
        assert_eq!(buf.write("ab我", 0, Encoding::Utf8).unwrap(), 2);
        assert_eq!(buf.write("abc", 1, Encoding::Utf16Le).unwrap(), 2);
        assert_eq!(buf.write("ff00", 3, Encoding::Hex).unwrap(), 1);
        assert_eq!(buf.to_vec(), [b'a', b'a', 0, 0xff]);
        assert!(buf.write("x", 5, Encoding::Utf8).is_err());
    }

    #[test]
    fn length_counts_bytes() {
        assert_eq!(ByteBuffer::from("www.runoob.com我").len(), 17);
        assert_eq!(ByteBuffer::from_string("tést", Encoding::Latin1).len(), 4);
    }

    #[test]
    fn concat_with_length_truncates_and_pads() {
        let a = ByteBuffer::from("abc");
        let b = ByteBuffer::from("def");
        assert_eq!(
            ByteBuffer::concat_with_length([&a, &b], 4).unwrap().to_string(),
            "abcd"
        );
        assert_eq!(
            ByteBuffer::concat_with_length([&a], 5_usize).unwrap().to_vec(),
            b"abc\0\0"
        );
        let joined = ByteBuffer::concat([&a, &b]);
        joined.set(0, b'X').unwrap();
        assert_eq!(a.to_string(), "abc");
    }

    #[rstest]
    #[case::oversized(usize::MAX)]
    #[case::just_past_max(MAX_LENGTH + 1)]
    fn concat_with_length_rejects_bad_totals(#[case] total: usize) {
        let a = ByteBuffer::from("abc");
        assert!(matches!(
            ByteBuffer::concat_with_length([&a], total),
            Err(BufferError::InvalidArgument(_))
        ));
    }

    #[test]
    fn concat_with_length_rejects_negative_totals() {
        let a = ByteBuffer::from("abc");
        assert!(matches!(
            ByteBuffer::concat_with_length([&a], -1),
            Err(BufferError::InvalidArgument(_))
        ));
    }

    #[test]
    fn ordering_follows_compare() {
        let abc = ByteBuffer::from("ABC");
        let abcd = ByteBuffer::from("ABCD");
        let b = ByteBuffer::from("B");
        assert_eq!(abc.compare(&abcd), Ordering::Less);
        assert_eq!(abcd.compare(&abc), Ordering::Greater);
        assert_eq!(abc.compare(&ByteBuffer::from("ABC")), Ordering::Equal);
        assert!(abcd < b);
        assert_eq!(abc, ByteBuffer::from_array([65, 66, 67]));
    }

    #[test]
    fn debug_matches_inspect_format() {
        let buf = ByteBuffer::from("hello");
        assert_eq!(format!("{buf:?}"), "<Buffer 68 65 6c 6c 6f>");
        assert_eq!(format!("{:?}", ByteBuffer::alloc(0).unwrap()), "<Buffer >");

        let long = ByteBuffer::alloc(51).unwrap();
        let rendered = format!("{long:?}");
        assert!(rendered.ends_with("00 ... 1 more byte>"), "{rendered}");
    }

    #[test]
    fn display_decodes_utf8() {
        let buf = ByteBuffer::from_array([0xe6, 0x88, 0x91]);
        assert_eq!(buf.to_string(), "我");
    }
}
