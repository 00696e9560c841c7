//! # Registry: known events and their attached listeners.
//!
//! The registry is the only mutable shared state of a bus. One `std::sync::Mutex`
//! guards both halves:
//!
//! ```text
//! State
//!  ├─ events:   Vec<Event>                     (insertion order, never shrinks)
//!  └─ handlers: HashMap<EventId, Vec<Listener>> (registration order, no empty lists)
//! ```
//!
//! ## Rules
//! - Every operation holds the lock only for a short, synchronous critical
//!   section; no handler code ever runs under it.
//! - `attach` deduplicates by [`HandlerId`]; `subscribe` does not.
//! - `detach` removes every entry with the id and prunes the list when empty.
//! - `snapshot` clones the list so dispatch runs lock-free.
//! - Lock poisoning is recovered: the guarded data is consistent after every
//!   statement, and user code never runs while it is held.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::events::{Event, EventId};
use crate::handlers::{HandlerId, Listener};

#[derive(Default)]
struct State {
    events: Vec<Event>,
    handlers: HashMap<EventId, Vec<Listener>>,
}

/// Outcome of [`Registry::create_event`].
pub(crate) enum Created {
    /// A new event was appended.
    New(Event),
    /// An event with this name already existed.
    Existing(Event),
}

impl Created {
    pub(crate) fn into_event(self) -> Event {
        match self {
            Created::New(ev) | Created::Existing(ev) => ev,
        }
    }
}

/// Event and handler registry of one bus.
#[derive(Default)]
pub(crate) struct Registry {
    state: Mutex<State>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the event named `name`, creating it if needed.
    pub(crate) fn create_event(&self, name: &str) -> Created {
        let mut state = self.lock();
        if let Some(ev) = state.events.iter().find(|ev| ev.name() == name) {
            return Created::Existing(ev.clone());
        }
        let ev = Event::new(EventId::next(), name);
        state.events.push(ev.clone());
        Created::New(ev)
    }

    /// Finds an event by name without creating it.
    pub(crate) fn lookup(&self, name: &str) -> Option<Event> {
        self.lock()
            .events
            .iter()
            .find(|ev| ev.name() == name)
            .cloned()
    }

    /// Known events in creation order.
    pub(crate) fn events(&self) -> Vec<Event> {
        self.lock().events.clone()
    }

    pub(crate) fn event_count(&self) -> usize {
        self.lock().events.len()
    }

    /// Appends `listener` to `event` unless the same id is already attached.
    ///
    /// Returns `true` if the listener was added.
    pub(crate) fn attach(&self, event: &Event, listener: &Listener) -> bool {
        let mut state = self.lock();
        let list = state.handlers.entry(event.id()).or_default();
        if list.iter().any(|l| l.id() == listener.id()) {
            return false;
        }
        list.push(listener.clone());
        true
    }

    /// Removes every entry of `id` under `event`, pruning an emptied list.
    ///
    /// Returns the number of removed entries (0 for unknown event or id).
    pub(crate) fn detach(&self, event: &Event, id: HandlerId) -> usize {
        let mut state = self.lock();
        let Some(list) = state.handlers.get_mut(&event.id()) else {
            return 0;
        };
        let before = list.len();
        list.retain(|l| l.id() != id);
        let removed = before - list.len();
        if list.is_empty() {
            state.handlers.remove(&event.id());
        }
        removed
    }

    /// Bulk attach without deduplication.
    ///
    /// - `targets` empty: every known event, in creation order.
    /// - `targets` given: only those that already have a handler entry.
    ///
    /// Returns the events the listener was appended to.
    pub(crate) fn subscribe(&self, listener: &Listener, targets: &[Event]) -> Vec<Event> {
        let mut guard = self.lock();
        let state = &mut *guard;
        let mut attached = Vec::new();

        if targets.is_empty() {
            for ev in &state.events {
                state
                    .handlers
                    .entry(ev.id())
                    .or_default()
                    .push(listener.clone());
                attached.push(ev.clone());
            }
            return attached;
        }

        for target in targets {
            if let Some(list) = state.handlers.get_mut(&target.id()) {
                list.push(listener.clone());
                attached.push(target.clone());
            }
        }
        attached
    }

    /// Copy of the listeners currently attached to `event`.
    pub(crate) fn snapshot(&self, event: &Event) -> Vec<Listener> {
        self.lock()
            .handlers
            .get(&event.id())
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn handler_count(&self, event: &Event) -> usize {
        self.lock()
            .handlers
            .get(&event.id())
            .map_or(0, Vec::len)
    }

    pub(crate) fn has_handlers(&self, event: &Event) -> bool {
        self.lock().handlers.contains_key(&event.id())
    }
}
