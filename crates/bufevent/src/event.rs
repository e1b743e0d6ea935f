//! Listener handles, event payloads, and the [`EventTarget`] capability.
//!
//! Every dispatch carries one [`Payload`]. Application events use
//! [`Payload::Data`]; the registry's own notifications and the `error` event
//! use the other variants, so a listener can always tell which shape it was
//! handed.

use alloc::{rc::Rc, string::String};
use core::{fmt, ptr};

use crate::{
    error::{EmitError, ListenerError},
    registry::EventRegistry,
};

/// Fired with [`Payload::NewListener`] before a listener is added.
pub const NEW_LISTENER: &str = "newListener";
/// Fired with [`Payload::RemoveListener`] after a listener is removed.
pub const REMOVE_LISTENER: &str = "removeListener";
/// Emitting this event with no listener registered is fatal.
pub const ERROR: &str = "error";

/// What a listener returns. An `Err` aborts the rest of the dispatch.
pub type ListenerResult = Result<(), ListenerError>;

/// The value handed to every listener of one dispatch.
#[derive(Debug)]
pub enum Payload<T> {
    /// An application event.
    Data(T),
    /// `listener` is about to be registered for `event`.
    NewListener {
        /// Event the listener is being added to.
        event: String,
        /// The listener being added.
        listener: Listener<T>,
    },
    /// `listener` was removed from `event`.
    RemoveListener {
        /// Event the listener was removed from.
        event: String,
        /// The listener that was removed.
        listener: Listener<T>,
    },
    /// A failure being reported through the `error` event.
    Error(ListenerError),
}

impl<T> Payload<T> {
    /// Wrap any error as an [`Payload::Error`].
    pub fn error(err: impl Into<ListenerError>) -> Self {
        Self::Error(err.into())
    }

    /// The application data, if this is a [`Payload::Data`].
    #[must_use]
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Data(data) => Some(data),
            _ => None,
        }
    }

    /// The reported error, if this is a [`Payload::Error`].
    #[must_use]
    pub fn as_error(&self) -> Option<&(dyn core::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Error(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl<T> From<T> for Payload<T> {
    fn from(data: T) -> Self {
        Self::Data(data)
    }
}

/// A registered callback.
///
/// Identity is the handle, not the closure's behaviour: clones of one
/// `Listener` are the same listener, while two `Listener::new` calls with
/// identical closures are different listeners. Removal matches by identity.
///
/// ```
/// use bufevent::{EventRegistry, Listener, Payload};
///
/// let registry = EventRegistry::<u32>::new();
/// let log = Listener::new(|payload: &Payload<u32>| {
///     assert_eq!(payload.data(), Some(&7));
///     Ok(())
/// });
/// registry.on("tick", &log).unwrap();
/// assert!(registry.emit("tick", Payload::Data(7)).unwrap());
/// assert!(registry.remove_listener("tick", &log).unwrap());
/// assert!(!registry.emit("tick", Payload::Data(7)).unwrap());
/// ```
pub struct Listener<T> {
    callback: Rc<dyn Fn(&Payload<T>) -> ListenerResult>,
}

impl<T> Listener<T> {
    /// Wrap `callback` in a new listener identity.
    pub fn new(callback: impl Fn(&Payload<T>) -> ListenerResult + 'static) -> Self {
        Self {
            callback: Rc::new(callback),
        }
    }

    /// Whether both handles refer to the same listener.
    #[must_use]
    pub fn same(&self, other: &Listener<T>) -> bool {
        ptr::addr_eq(Rc::as_ptr(&self.callback), Rc::as_ptr(&other.callback))
    }

    /// Invoke the callback directly.
    ///
    /// # Errors
    ///
    /// Whatever the callback returns.
    pub fn call(&self, payload: &Payload<T>) -> ListenerResult {
        (self.callback)(payload)
    }
}

impl<T> Clone for Listener<T> {
    fn clone(&self) -> Self {
        Self {
            callback: Rc::clone(&self.callback),
        }
    }
}

impl<T> PartialEq for Listener<T> {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl<T> Eq for Listener<T> {}

impl<T> fmt::Debug for Listener<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({:p})", Rc::as_ptr(&self.callback).cast::<()>())
    }
}

/// Something that dispatches events through an [`EventRegistry`] it holds.
///
/// Implementors only supply [`EventTarget::events`]; the registration and
/// dispatch methods delegate to it.
///
/// ```
/// use bufevent::{EventRegistry, EventTarget, Listener, Payload};
///
/// struct Server {
///     events: EventRegistry<u16>,
/// }
///
/// impl EventTarget<u16> for Server {
///     fn events(&self) -> &EventRegistry<u16> {
///         &self.events
///     }
/// }
///
/// let server = Server { events: EventRegistry::new() };
/// server.on("connection", &Listener::new(|_| Ok(()))).unwrap();
/// assert!(server.emit("connection", Payload::Data(8080)).unwrap());
/// ```
pub trait EventTarget<T> {
    /// The registry events are dispatched through.
    fn events(&self) -> &EventRegistry<T>;

    /// See [`EventRegistry::on`].
    ///
    /// # Errors
    ///
    /// A failing `newListener` listener.
    fn on(&self, event: &str, listener: &Listener<T>) -> Result<(), EmitError> {
        self.events().on(event, listener)
    }

    /// See [`EventRegistry::once`].
    ///
    /// # Errors
    ///
    /// A failing `newListener` listener.
    fn once(&self, event: &str, listener: &Listener<T>) -> Result<(), EmitError> {
        self.events().once(event, listener)
    }

    /// See [`EventRegistry::remove_listener`].
    ///
    /// # Errors
    ///
    /// A failing `removeListener` listener.
    fn off(&self, event: &str, listener: &Listener<T>) -> Result<bool, EmitError> {
        self.events().remove_listener(event, listener)
    }

    /// See [`EventRegistry::emit`].
    ///
    /// # Errors
    ///
    /// The first failing listener.
    fn emit(&self, event: &str, payload: Payload<T>) -> Result<bool, EmitError> {
        self.events().emit(event, payload)
    }
}

impl<T> EventTarget<T> for EventRegistry<T> {
    fn events(&self) -> &EventRegistry<T> {
        self
    }
}
