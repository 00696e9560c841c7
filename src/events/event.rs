//! # Named events and their identities.
//!
//! An [`Event`] is a named channel created through
//! [`Bus::create_event`](crate::Bus::create_event). Every newly created name
//! receives an [`EventId`] from a process-wide monotonically increasing
//! counter, so identity never depends on addresses and an event created on
//! one bus can never alias an event of another bus.
//!
//! ## Rules
//! - One event per distinct name per bus; asking again returns the same event.
//! - Equality and hashing use the id only; the name is carried for logs.
//! - Events are never deleted.
//!
//! ## Example
//! ```rust
//! use eventvisor::Bus;
//!
//! let bus = Bus::new();
//! let a = bus.create_event("user:created");
//! let b = bus.create_event("user:created");
//!
//! assert_eq!(a, b);
//! assert_eq!(a.name(), "user:created");
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// Global sequence counter for event identities.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Event identity.
///
/// Ids start at 1 and increase with every newly created name, across all buses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(u64);

impl EventId {
    pub(crate) fn next() -> Self {
        Self(EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed) + 1)
    }

    /// Returns the raw numeric id.
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named event registered on a bus.
///
/// Cheap to clone: the name is shared.
#[derive(Clone)]
pub struct Event {
    id: EventId,
    name: Arc<str>,
}

impl Event {
    pub(crate) fn new(id: EventId, name: impl Into<Arc<str>>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Process-unique identity.
    #[inline]
    pub fn id(&self) -> EventId {
        self.id
    }

    /// Human-readable name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Event {}

impl Hash for Event {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("id", &self.id.0)
            .field("name", &&*self.name)
            .finish()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
