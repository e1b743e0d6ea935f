use alloc::{boxed::Box, string::String};

use thiserror::Error;

/// Failure raised by a listener, or carried by an `error` event.
pub type ListenerError = Box<dyn core::error::Error + Send + Sync + 'static>;

/// Errors raised by [`ByteBuffer`](crate::ByteBuffer) operations and codec
/// lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// A size was negative, too large, or an argument had the wrong shape.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// An offset or length fell outside the bounds of a buffer.
    #[error("\"{name}\" is out of range: expected {expected}, received {received}")]
    Range {
        /// Argument that was out of range.
        name: &'static str,
        /// Human readable description of the accepted range.
        expected: String,
        /// The value that was passed.
        received: usize,
    },
    /// An encoding name was passed explicitly but is not a known codec.
    #[error("unknown encoding: {0}")]
    UnsupportedEncoding(String),
}

impl BufferError {
    pub(crate) fn range(name: &'static str, expected: impl Into<String>, received: usize) -> Self {
        Self::Range {
            name,
            expected: expected.into(),
            received,
        }
    }
}

/// Errors surfaced by [`EventRegistry`](crate::EventRegistry) dispatch.
#[derive(Error, Debug)]
pub enum EmitError {
    /// A listener failed; listeners after it in the same dispatch did not run.
    #[error("listener for \"{event}\" failed: {source}")]
    Listener {
        /// Event being dispatched when the listener failed.
        event: String,
        /// The listener's own error.
        #[source]
        source: ListenerError,
    },
}

impl EmitError {
    /// Name of the event whose dispatch was aborted.
    #[must_use]
    pub fn event(&self) -> &str {
        match self {
            Self::Listener { event, .. } => event,
        }
    }
}
