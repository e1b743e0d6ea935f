/// Configuration for an [`EventRegistry`](crate::EventRegistry).
///
/// # Examples
///
/// ```rust
/// use bufevent::{EventRegistry, RegistryOptions};
///
/// let registry: EventRegistry<()> = EventRegistry::with_options(RegistryOptions {
///     max_listeners: 32,
/// });
/// assert_eq!(registry.max_listeners(), 32);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryOptions {
    /// Number of listeners a single event may hold before a possible leak is
    /// reported.
    ///
    /// Crossing the threshold logs one `tracing` warning per event name. It
    /// never rejects the registration. `0` disables the check.
    ///
    /// # Default
    ///
    /// `10`
    pub max_listeners: usize,
}

impl RegistryOptions {
    /// Default value of [`RegistryOptions::max_listeners`].
    pub const DEFAULT_MAX_LISTENERS: usize = 10;
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            max_listeners: Self::DEFAULT_MAX_LISTENERS,
        }
    }
}

/// Configuration for a [`BufferPool`](crate::BufferPool).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolOptions {
    /// Size in bytes of each shared slab.
    ///
    /// Requests smaller than half a slab are carved out of the current slab.
    /// Larger requests get their own allocation. `0` disables pooling.
    ///
    /// # Default
    ///
    /// `8192`
    pub pool_size: usize,
}

impl PoolOptions {
    /// Default value of [`PoolOptions::pool_size`].
    pub const DEFAULT_POOL_SIZE: usize = 8 * 1024;
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            pool_size: Self::DEFAULT_POOL_SIZE,
        }
    }
}
