//! Synchronous named-event dispatch.
//!
//! An [`EventRegistry`] maps event names to ordered listener lists. `emit`
//! runs every listener registered at the moment it was called, in order, on
//! the caller's stack, and returns once they have all finished.
//!
//! # Dispatch rules
//!
//! - The listener list is snapshotted when `emit` starts. Listeners added
//!   while it runs wait for the next `emit`; listeners removed while it runs
//!   still get this one.
//! - A `once` listener is taken off the live list as it fires, so no later
//!   (or nested) `emit` reaches it again.
//! - The first listener to return `Err` stops the dispatch and its error is
//!   returned from `emit`.
//! - Emitting `"error"` with no listener panics: nothing took responsibility
//!   for the failure.
//!
//! ```
//! use std::{cell::Cell, rc::Rc};
//!
//! use bufevent::{EventRegistry, Listener, Payload};
//!
//! let registry = EventRegistry::<()>::new();
//! let calls = Rc::new(Cell::new(0));
//!
//! let counter = Rc::clone(&calls);
//! let f1 = Listener::new(move |_| {
//!     counter.set(counter.get() + 1);
//!     Ok(())
//! });
//! let counter = Rc::clone(&calls);
//! let f2 = Listener::new(move |_| {
//!     counter.set(counter.get() + 10);
//!     Ok(())
//! });
//!
//! registry.on("e", &f1).unwrap();
//! registry.once("e", &f2).unwrap();
//! registry.emit("e", Payload::Data(())).unwrap();
//! registry.emit("e", Payload::Data(())).unwrap();
//! assert_eq!(calls.get(), 12);
//! ```

use alloc::{
    borrow::ToOwned,
    collections::{BTreeMap, BTreeSet},
    rc::Rc,
    string::String,
    vec::Vec,
};
use core::{
    cell::{Cell, RefCell},
    fmt,
};

use crate::{
    error::{EmitError, ListenerError},
    event::{ERROR, Listener, NEW_LISTENER, Payload, REMOVE_LISTENER},
    options::RegistryOptions,
};

struct Entry<T> {
    listener: Listener<T>,
    once: bool,
    fired: Cell<bool>,
}

type EntryList<T> = Vec<Rc<Entry<T>>>;

/// Maps event names to ordered listener lists and dispatches to them
/// synchronously.
///
/// The registry is an ordinary value: construct one and hand it (or a
/// reference to it) to whatever needs it. All methods take `&self`, so
/// listeners can register, remove, and emit on the registry that is calling
/// them.
pub struct EventRegistry<T> {
    events: RefCell<BTreeMap<String, EntryList<T>>>,
    max_listeners: Cell<usize>,
    warned: RefCell<BTreeSet<String>>,
}

impl<T> EventRegistry<T> {
    /// An empty registry with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(RegistryOptions::default())
    }

    /// An empty registry with the given options.
    #[must_use]
    pub fn with_options(options: RegistryOptions) -> Self {
        Self {
            events: RefCell::new(BTreeMap::new()),
            max_listeners: Cell::new(options.max_listeners),
            warned: RefCell::new(BTreeSet::new()),
        }
    }

    /// Append `listener` to `event`'s list.
    ///
    /// `newListener` fires first, with the listener not yet in place. The
    /// same listener may be added any number of times and then fires once
    /// per registration.
    ///
    /// # Errors
    ///
    /// A `newListener` listener failed; `listener` was not added.
    pub fn on(&self, event: &str, listener: &Listener<T>) -> Result<(), EmitError> {
        self.add(event, listener, false, false)
    }

    /// Alias of [`EventRegistry::on`].
    ///
    /// # Errors
    ///
    /// See [`EventRegistry::on`].
    pub fn add_listener(&self, event: &str, listener: &Listener<T>) -> Result<(), EmitError> {
        self.on(event, listener)
    }

    /// Append `listener` so that it fires at most once.
    ///
    /// # Errors
    ///
    /// See [`EventRegistry::on`].
    pub fn once(&self, event: &str, listener: &Listener<T>) -> Result<(), EmitError> {
        self.add(event, listener, true, false)
    }

    /// Insert `listener` at the head of `event`'s list.
    ///
    /// # Errors
    ///
    /// See [`EventRegistry::on`].
    pub fn prepend_listener(&self, event: &str, listener: &Listener<T>) -> Result<(), EmitError> {
        self.add(event, listener, false, true)
    }

    /// Insert a fire-once `listener` at the head of `event`'s list.
    ///
    /// # Errors
    ///
    /// See [`EventRegistry::on`].
    pub fn prepend_once_listener(
        &self,
        event: &str,
        listener: &Listener<T>,
    ) -> Result<(), EmitError> {
        self.add(event, listener, true, true)
    }

    fn add(
        &self,
        event: &str,
        listener: &Listener<T>,
        once: bool,
        prepend: bool,
    ) -> Result<(), EmitError> {
        self.emit(
            NEW_LISTENER,
            Payload::NewListener {
                event: event.to_owned(),
                listener: listener.clone(),
            },
        )?;

        let count = {
            let mut events = self.events.borrow_mut();
            let list = events.entry(event.to_owned()).or_default();
            let entry = Rc::new(Entry {
                listener: listener.clone(),
                once,
                fired: Cell::new(false),
            });
            if prepend {
                list.insert(0, entry);
            } else {
                list.push(entry);
            }
            list.len()
        };
        self.check_listener_leak(event, count);
        Ok(())
    }

    fn check_listener_leak(&self, event: &str, count: usize) {
        let max = self.max_listeners.get();
        if max == 0 || count <= max {
            return;
        }
        if self.warned.borrow_mut().insert(event.to_owned()) {
            tracing::warn!(
                event,
                count,
                max,
                "possible listener leak: {count} \"{event}\" listeners added, more than the limit of {max}; raise it with set_max_listeners"
            );
        }
    }

    /// Remove the first registration of `listener` from `event`, then fire
    /// `removeListener`. Returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// A `removeListener` listener failed. The removal itself has already
    /// happened.
    pub fn remove_listener(&self, event: &str, listener: &Listener<T>) -> Result<bool, EmitError> {
        let removed = {
            let mut events = self.events.borrow_mut();
            let Some(list) = events.get_mut(event) else {
                return Ok(false);
            };
            let Some(pos) = list.iter().position(|e| e.listener.same(listener)) else {
                return Ok(false);
            };
            list.remove(pos)
        };
        self.forget_if_empty(event);
        self.notify_removed(event, &removed)?;
        Ok(true)
    }

    /// Alias of [`EventRegistry::remove_listener`].
    ///
    /// # Errors
    ///
    /// See [`EventRegistry::remove_listener`].
    pub fn off(&self, event: &str, listener: &Listener<T>) -> Result<bool, EmitError> {
        self.remove_listener(event, listener)
    }

    /// Remove every listener of `event`, or of every event when `None`.
    ///
    /// `removeListener` fires for each removed listener, most recently added
    /// first. When clearing everything, `removeListener`'s own listeners go
    /// last so they observe the rest being removed.
    ///
    /// # Errors
    ///
    /// A `removeListener` listener failed. Lists already cleared stay
    /// cleared.
    pub fn remove_all_listeners(&self, event: Option<&str>) -> Result<(), EmitError> {
        let Some(event) = event else {
            let names: Vec<String> = self
                .event_names()
                .into_iter()
                .filter(|name| name != REMOVE_LISTENER)
                .collect();
            for name in &names {
                self.remove_all_listeners(Some(name))?;
            }
            return self.remove_all_listeners(Some(REMOVE_LISTENER));
        };

        let removed = self.events.borrow_mut().remove(event);
        self.warned.borrow_mut().remove(event);
        let Some(removed) = removed else {
            return Ok(());
        };
        if event != REMOVE_LISTENER {
            for entry in removed.iter().rev() {
                self.notify_removed(event, entry)?;
            }
        }
        Ok(())
    }

    fn forget_if_empty(&self, event: &str) {
        let mut events = self.events.borrow_mut();
        if events.get(event).is_some_and(Vec::is_empty) {
            events.remove(event);
            self.warned.borrow_mut().remove(event);
        }
    }

    fn notify_removed(&self, event: &str, entry: &Entry<T>) -> Result<(), EmitError> {
        self.emit(
            REMOVE_LISTENER,
            Payload::RemoveListener {
                event: event.to_owned(),
                listener: entry.listener.clone(),
            },
        )
        .map(|_| ())
    }

    /// Take a fire-once entry off the live list. It may already be gone if
    /// some listener removed it during this dispatch.
    fn detach(&self, event: &str, entry: &Rc<Entry<T>>) -> Result<(), EmitError> {
        let found = {
            let mut events = self.events.borrow_mut();
            events
                .get_mut(event)
                .and_then(|list| {
                    list.iter()
                        .position(|e| Rc::ptr_eq(e, entry))
                        .map(|pos| list.remove(pos))
                })
                .is_some()
        };
        if found {
            self.forget_if_empty(event);
            self.notify_removed(event, entry)?;
        }
        Ok(())
    }

    /// Call every listener of `event` with `payload`, in order. Returns
    /// whether there were any.
    ///
    /// # Errors
    ///
    /// The first listener to fail. Listeners after it do not run.
    ///
    /// # Panics
    ///
    /// If `event` is `"error"` and no listener is registered for it. The
    /// panic message carries the reported error.
    pub fn emit(&self, event: &str, payload: Payload<T>) -> Result<bool, EmitError> {
        let snapshot: EntryList<T> = self
            .events
            .borrow()
            .get(event)
            .cloned()
            .unwrap_or_default();

        if snapshot.is_empty() {
            if event == ERROR {
                unhandled_error(&payload);
            }
            return Ok(false);
        }

        for entry in &snapshot {
            if entry.once {
                if entry.fired.replace(true) {
                    continue;
                }
                self.detach(event, entry)?;
            }
            entry
                .listener
                .call(&payload)
                .map_err(|source| EmitError::Listener {
                    event: event.to_owned(),
                    source,
                })?;
        }
        Ok(true)
    }

    /// Emit `data` as a [`Payload::Data`].
    ///
    /// # Errors
    ///
    /// See [`EventRegistry::emit`].
    pub fn emit_data(&self, event: &str, data: T) -> Result<bool, EmitError> {
        self.emit(event, Payload::Data(data))
    }

    /// Report `err` through the `error` event.
    ///
    /// # Errors
    ///
    /// See [`EventRegistry::emit`].
    ///
    /// # Panics
    ///
    /// If no `error` listener is registered.
    pub fn emit_error(&self, err: impl Into<ListenerError>) -> Result<bool, EmitError> {
        self.emit(ERROR, Payload::error(err))
    }

    /// Number of listeners currently registered for `event`.
    #[must_use]
    pub fn listener_count(&self, event: &str) -> usize {
        self.events.borrow().get(event).map_or(0, Vec::len)
    }

    /// The listeners currently registered for `event`, in dispatch order.
    #[must_use]
    pub fn listeners(&self, event: &str) -> Vec<Listener<T>> {
        self.events
            .borrow()
            .get(event)
            .map(|list| list.iter().map(|e| e.listener.clone()).collect())
            .unwrap_or_default()
    }

    /// Names of the events that currently have listeners, sorted.
    #[must_use]
    pub fn event_names(&self) -> Vec<String> {
        self.events.borrow().keys().cloned().collect()
    }

    /// Change the listener-leak threshold. `0` disables it.
    pub fn set_max_listeners(&self, max: usize) -> &Self {
        self.max_listeners.set(max);
        self
    }

    /// The current listener-leak threshold.
    #[must_use]
    pub fn max_listeners(&self) -> usize {
        self.max_listeners.get()
    }
}

fn unhandled_error<T>(payload: &Payload<T>) -> ! {
    match payload.as_error() {
        Some(err) => panic!("unhandled 'error' event: {err}"),
        None => panic!("unhandled 'error' event"),
    }
}

impl<T> Default for EventRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for EventRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let events = self.events.borrow();
        f.debug_struct("EventRegistry")
            .field(
                "events",
                &events
                    .iter()
                    .map(|(name, list)| (name, list.len()))
                    .collect::<BTreeMap<_, _>>(),
            )
            .field("max_listeners", &self.max_listeners.get())
            .finish()
    }
}
