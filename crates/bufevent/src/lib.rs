//! Two small runtime primitives:
//!
//! - [`ByteBuffer`]: fixed-length bytes that either own their storage or
//!   alias a window of another buffer, with text conversion through a fixed
//!   registry of [`Encoding`]s.
//! - [`EventRegistry`]: synchronous, in-process publish/subscribe keyed by
//!   event name.
//!
//! Both are single-threaded and do no I/O.
//!
//! ```rust
//! use bufevent::{ByteBuffer, Encoding};
//!
//! let buf = ByteBuffer::from_string("hello", Encoding::Ascii);
//! assert_eq!(buf.to_string_with(Encoding::Hex), "68656c6c6f");
//! assert_eq!(buf.to_string_with(Encoding::Base64), "aGVsbG8=");
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod buffer;
mod coerce;
mod event;
mod interchange;
mod pool;
mod registry;

pub mod codec;
mod error;
mod options;

#[cfg(test)]
mod tests;

pub use buffer::{ByteBuffer, INSPECT_MAX_BYTES, MAX_LENGTH};
pub use codec::{Codec, Encoding};
pub use coerce::ByteValue;
pub use error::{BufferError, EmitError, ListenerError};
pub use event::{
    ERROR, EventTarget, Listener, ListenerResult, NEW_LISTENER, Payload, REMOVE_LISTENER,
};
pub use interchange::{BufferJson, JsonKind};
pub use options::{PoolOptions, RegistryOptions};
pub use pool::BufferPool;
pub use registry::EventRegistry;
