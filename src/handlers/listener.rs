//! # Listener: a handler instance with an explicit identity.
//!
//! Handlers are compared by instance, never by behavior. A [`Listener`] pairs
//! a shared [`Handler`] with a [`HandlerId`] drawn from a process-wide counter
//! when the listener is created:
//!
//! ```text
//! Listener::new(h)  ──► id = 1
//! listener.clone()  ──► id = 1   (same instance, deduplicated by `on`)
//! Listener::new(h2) ──► id = 2   (even if h2 wraps the same closure body)
//! ```
//!
//! `Bus::on` returns the id; `Bus::off` takes it.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use super::handler::Handler;

/// Global counter for handler identities.
static HANDLER_SEQ: AtomicU64 = AtomicU64::new(0);

/// Opaque handler identity token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

impl HandlerId {
    fn next() -> Self {
        Self(HANDLER_SEQ.fetch_add(1, AtomicOrdering::Relaxed) + 1)
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handler#{}", self.0)
    }
}

/// Shared reference to a handler (`Arc<dyn Handler>`).
pub type HandlerRef = Arc<dyn Handler>;

/// A handler instance bound to its identity.
///
/// Cheap to clone; clones keep the id.
#[derive(Clone)]
pub struct Listener {
    id: HandlerId,
    handler: HandlerRef,
}

impl Listener {
    /// Wraps `handler` under a fresh id.
    pub fn new<H: Handler>(handler: H) -> Self {
        Self::from_ref(Arc::new(handler))
    }

    /// Wraps an already shared handler under a fresh id.
    ///
    /// Calling this twice with the same `Arc` yields two distinct listeners.
    pub fn from_ref(handler: HandlerRef) -> Self {
        Self {
            id: HandlerId::next(),
            handler,
        }
    }

    /// Identity token used by `on`/`off`.
    #[inline]
    pub fn id(&self) -> HandlerId {
        self.id
    }

    /// Handler name (for logs).
    #[inline]
    pub fn name(&self) -> &str {
        self.handler.name()
    }

    pub(crate) fn handler(&self) -> &HandlerRef {
        &self.handler
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("id", &self.id)
            .field("name", &self.name())
            .finish()
    }
}
