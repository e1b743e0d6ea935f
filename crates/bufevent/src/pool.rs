//! Slab-backed allocation of buffers with unspecified contents.
//!
//! Small requests are carved out of a shared slab instead of getting their
//! own allocation, and the carved region is not cleared. The buffers handed
//! out are independent windows: none overlaps another. They do keep the whole
//! slab alive.

use alloc::{rc::Rc, vec};
use core::{cell::RefCell, fmt};

use crate::{
    buffer::{ByteBuffer, Storage, checked_size},
    error::BufferError,
    options::PoolOptions,
};

/// Carved regions start on this alignment.
const ALIGN: usize = 8;

/// A caller-owned allocator for [`ByteBuffer`]s whose contents are
/// **unspecified**.
///
/// Buffers from [`BufferPool::alloc_unsafe`] may hold bytes left behind by an
/// earlier user of the slab. Overwrite them before reading and never expose an
/// unfilled buffer beyond a trust boundary. Use [`ByteBuffer::alloc`] when in
/// doubt.
///
/// ```
/// use bufevent::BufferPool;
///
/// let mut pool = BufferPool::default();
/// let a = pool.alloc_unsafe(10).unwrap();
/// let b = pool.alloc_unsafe(10).unwrap();
/// assert!(a.shares_storage(&b));
/// a.fill(1, ..).unwrap();
/// b.fill(2, ..).unwrap();
/// assert_eq!(a.to_vec(), [1; 10]);
/// ```
pub struct BufferPool {
    options: PoolOptions,
    slab: Option<Storage>,
    used: usize,
}

impl BufferPool {
    /// A pool with the given options. No slab is allocated until the first
    /// pooled request.
    #[must_use]
    pub fn new(options: PoolOptions) -> Self {
        Self {
            options,
            slab: None,
            used: 0,
        }
    }

    /// The options this pool was built with.
    #[must_use]
    pub fn options(&self) -> PoolOptions {
        self.options
    }

    /// Bytes still free in the current slab.
    #[must_use]
    pub fn remaining(&self) -> usize {
        match self.slab {
            Some(_) => self.options.pool_size - self.used,
            None => 0,
        }
    }

    /// A buffer of `size` bytes with unspecified contents.
    ///
    /// Requests below half the slab size share a slab; anything larger gets a
    /// dedicated allocation via [`ByteBuffer::alloc_unsafe`].
    ///
    /// # Errors
    ///
    /// [`BufferError::InvalidArgument`] if `size` is negative or larger than
    /// [`MAX_LENGTH`](crate::MAX_LENGTH).
    pub fn alloc_unsafe<S>(&mut self, size: S) -> Result<ByteBuffer, BufferError>
    where
        S: TryInto<usize> + Copy + fmt::Display,
    {
        let size = checked_size(size)?;
        if size == 0 || size >= self.options.pool_size >> 1 {
            return ByteBuffer::alloc_unsafe(size);
        }
        if self.remaining() < size {
            self.rotate();
        }
        let Some(slab) = self.slab.as_ref() else {
            return ByteBuffer::alloc_unsafe(size);
        };

        let buf = ByteBuffer::from_parts(Rc::clone(slab), self.used, size, false);
        self.used = (self.used + size)
            .next_multiple_of(ALIGN)
            .min(self.options.pool_size);
        Ok(buf)
    }

    fn rotate(&mut self) {
        tracing::trace!(pool_size = self.options.pool_size, "allocating new buffer pool slab");
        self.slab = Some(Rc::new(RefCell::new(vec![0; self.options.pool_size])));
        self.used = 0;
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(PoolOptions::default())
    }
}

impl fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferPool")
            .field("options", &self.options)
            .field("used", &self.used)
            .field("remaining", &self.remaining())
            .finish_non_exhaustive()
    }
}
