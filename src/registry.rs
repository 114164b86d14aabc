//! Per-node listener registry.
//!
//! [`Listeners`] maps event names to callbacks in registration order and
//! supports plain and one-shot registration, removal by [`ListenerId`], and
//! synchronous notify-all. Notification runs against a snapshot of the
//! registration list, so a callback may freely register or remove listeners
//! on the node it is running on; the change applies from the next
//! notification onwards.

use std::collections::HashMap;
use std::rc::Rc;

use crate::error::DispatchError;
use crate::facade::EventFacade;
use crate::listener::Listener;

/// Handle identifying one registration, returned by the register methods
/// and consumed by [`Listeners::unregister`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Entry<T> {
    id: ListenerId,
    once: bool,
    listener: Rc<dyn Listener<T>>,
}

/// Ordered listener storage for one node.
pub struct Listeners<T> {
    channels: HashMap<String, Vec<Entry<T>>>,
    next_id: u64,
}

impl<T> Listeners<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            channels: HashMap::new(),
            next_id: 0,
        }
    }

    /// Append a listener under `event`.
    pub fn register(
        &mut self,
        event: impl Into<String>,
        listener: impl Listener<T> + 'static,
    ) -> ListenerId {
        self.insert(event.into(), Rc::new(listener), false)
    }

    /// Append a listener under `event` that is removed before its first
    /// invocation, so it runs at most once even if it re-enters dispatch.
    pub fn register_once(
        &mut self,
        event: impl Into<String>,
        listener: impl Listener<T> + 'static,
    ) -> ListenerId {
        self.insert(event.into(), Rc::new(listener), true)
    }

    fn insert(&mut self, event: String, listener: Rc<dyn Listener<T>>, once: bool) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.channels.entry(event).or_default().push(Entry {
            id,
            once,
            listener,
        });
        id
    }

    /// Remove the registration identified by `id` under `event`.
    ///
    /// Returns whether a listener was removed.
    pub fn unregister(&mut self, event: &str, id: ListenerId) -> bool {
        let Some(entries) = self.channels.get_mut(event) else {
            return false;
        };
        let previous = entries.len();
        entries.retain(|entry| entry.id != id);
        let removed = entries.len() != previous;
        if entries.is_empty() {
            self.channels.remove(event);
        }
        removed
    }

    /// Remove every listener registered under `event`.
    pub fn clear(&mut self, event: &str) {
        self.channels.remove(event);
    }

    /// Number of listeners registered under `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.channels.get(event).map_or(0, Vec::len)
    }

    /// Total number of registered listeners.
    pub fn len(&self) -> usize {
        self.channels.values().map(Vec::len).sum()
    }

    /// Whether no listeners are registered at all.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Take the current batch for `event` in registration order.
    ///
    /// One-shot entries are removed here, before invocation, which is what
    /// keeps them single-fire under re-entrant dispatch.
    pub fn snapshot(&mut self, event: &str) -> Vec<Rc<dyn Listener<T>>> {
        let Some(entries) = self.channels.get_mut(event) else {
            return Vec::new();
        };
        let batch: Vec<_> = entries
            .iter()
            .map(|entry| Rc::clone(&entry.listener))
            .collect();
        entries.retain(|entry| !entry.once);
        if entries.is_empty() {
            self.channels.remove(event);
        }
        batch
    }

    /// Notify every listener registered under `event`, synchronously, in
    /// registration order. Stops at the first failing listener.
    pub fn notify(&mut self, event: &str, ctx: &mut EventFacade<T>) -> Result<(), DispatchError> {
        for listener in self.snapshot(event) {
            listener
                .on_event(ctx)
                .map_err(|source| DispatchError::Listener {
                    event: event.to_owned(),
                    source,
                })?;
        }
        Ok(())
    }
}

impl<T> Default for Listeners<T> {
    fn default() -> Self {
        Self::new()
    }
}
