//! # Bus: event registry, handler registry, dispatcher and completion barrier.
//!
//! The [`Bus`] is the whole public surface of the crate. It owns:
//! - a [`Registry`] (known events + attached listeners, one mutex);
//! - a [`Barrier`] counting in-flight deliveries across all events;
//! - the [`BusConfig`] and an optional pinned runtime handle.
//!
//! ## Operation overview
//! ```text
//! create_event(name) ──► registry lock ──► existing or new Event
//! on(ev, listener)   ──► registry lock ──► append unless same HandlerId present
//! off(ev, id)        ──► registry lock ──► remove all with id, prune empty list
//! subscribe(l, evs)  ──► registry lock ──► bulk append (no dedupe)
//! emit(ev, data, ..) ──► registry lock ──► snapshot ──► unlock
//!                                             └──► Dispatcher: barrier.enter + spawn per listener
//! wait()             ──► barrier reaches zero (all events, all emits)
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use eventvisor::{Bus, Delivery, EventData, HandlerFn};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), eventvisor::BusError> {
//!     let bus = Bus::new();
//!     let ev = bus.create_event("example:event");
//!
//!     let calls = Arc::new(AtomicUsize::new(0));
//!     let c = Arc::clone(&calls);
//!     let listener = HandlerFn::listener("counter", move |d: Delivery| {
//!         let c = Arc::clone(&c);
//!         async move {
//!             assert_eq!(d.arg(0), Some("arg1"));
//!             c.fetch_add(1, Ordering::SeqCst);
//!         }
//!     });
//!
//!     bus.on(&ev, &listener);
//!     bus.emit(&ev, EventData::new("Hello"), ["arg1"])?;
//!     bus.wait().await;
//!
//!     assert_eq!(calls.load(Ordering::SeqCst), 1);
//!     Ok(())
//! }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use tokio::runtime::Handle;

use crate::core::{
    barrier::Barrier,
    builder::BusBuilder,
    config::BusConfig,
    dispatch::Dispatcher,
    registry::{Created, Registry},
};
use crate::error::BusError;
use crate::events::{Event, EventData};
use crate::handlers::{HandlerId, Listener};

/// Process-wide default bus, created on first use.
static GLOBAL: OnceLock<Bus> = OnceLock::new();

struct Inner {
    cfg: BusConfig,
    registry: Registry,
    dispatcher: Dispatcher,
    runtime: Option<Handle>,
}

/// In-process publish/subscribe event bus.
///
/// ### Properties
/// - **Cloneable**: clones share the same state (internally an `Arc`).
/// - **Isolated**: separately constructed buses share nothing.
/// - **Non-blocking emit**: `emit` only snapshots and spawns.
/// - **Bus-wide join**: `wait` covers every delivery of every event.
#[derive(Clone)]
pub struct Bus {
    inner: Arc<Inner>,
}

impl Bus {
    /// Creates an independent, empty bus with the default config.
    #[must_use]
    pub fn new() -> Self {
        Self::builder(BusConfig::default()).build()
    }

    /// Returns a builder for a bus with the given config.
    pub fn builder(cfg: BusConfig) -> BusBuilder {
        BusBuilder::new(cfg)
    }

    /// The process-wide default bus.
    ///
    /// Created with `BusConfig::default()` on first call; behaves exactly like
    /// a bus from [`Bus::new`]. Prefer passing an explicit bus around; this
    /// exists for code that has no way to receive one.
    pub fn global() -> &'static Bus {
        GLOBAL.get_or_init(Bus::new)
    }

    pub(crate) fn from_parts(cfg: BusConfig, runtime: Option<Handle>) -> Self {
        let dispatcher = Dispatcher {
            label: Arc::from(&*cfg.label),
            policy: cfg.panic_policy,
            barrier: Barrier::new(),
            panicked: Arc::new(AtomicU64::new(0)),
        };
        Self {
            inner: Arc::new(Inner {
                cfg,
                registry: Registry::new(),
                dispatcher,
                runtime,
            }),
        }
    }

    /// Returns the event named `name`, creating it on first request.
    ///
    /// Idempotent: later calls with the same name return an equal [`Event`]
    /// and change nothing.
    pub fn create_event(&self, name: impl Into<String>) -> Event {
        let created = self.inner.registry.create_event(&name.into());
        if let Created::New(ev) = &created {
            tracing::debug!(bus = self.label(), event = ev.name(), id = ev.id().get(), "event created");
        }
        created.into_event()
    }

    /// Attaches `listener` to `event` and returns its id.
    ///
    /// Attaching the same listener (same [`HandlerId`]) again is a no-op.
    /// The first attach creates the event's handler list.
    pub fn on(&self, event: &Event, listener: &Listener) -> HandlerId {
        let added = self.inner.registry.attach(event, listener);
        tracing::debug!(
            bus = self.label(),
            event = event.name(),
            handler = listener.name(),
            id = %listener.id(),
            added,
            "handler attached"
        );
        listener.id()
    }

    /// Detaches every entry of handler `id` from `event`.
    ///
    /// Unknown events and ids are ignored. An emptied handler list is dropped.
    pub fn off(&self, event: &Event, id: HandlerId) {
        let removed = self.inner.registry.detach(event, id);
        if removed > 0 {
            tracing::debug!(bus = self.label(), event = event.name(), %id, removed, "handler detached");
        }
    }

    /// Attaches `listener` to many events at once, returning how many.
    ///
    /// - `targets` empty: every event created so far, in creation order.
    ///   Events created later are not included.
    /// - `targets` given: only those that already have at least one handler
    ///   attached; an event whose handler list does not exist yet is skipped.
    ///
    /// No deduplication happens here: a listener already attached through
    /// [`on`](Self::on) is appended a second time and then runs twice per emit.
    pub fn subscribe(&self, listener: &Listener, targets: &[Event]) -> usize {
        let attached = self.inner.registry.subscribe(listener, targets);
        let skipped = targets.len().saturating_sub(attached.len());
        tracing::debug!(
            bus = self.label(),
            handler = listener.name(),
            id = %listener.id(),
            attached = attached.len(),
            skipped,
            "handler subscribed"
        );
        attached.len()
    }

    /// Schedules one concurrent delivery of `data` and `args` per handler
    /// currently attached to `event`, and returns without waiting.
    ///
    /// Returns the number of scheduled deliveries; `Ok(0)` for an event
    /// without handlers or unknown to this bus.
    ///
    /// # Errors
    /// [`BusError::NoRuntime`] if the bus has no pinned runtime and the caller
    /// is not inside a Tokio runtime. Nothing is scheduled in that case.
    pub fn emit<I, S>(&self, event: &Event, data: EventData, args: I) -> Result<usize, BusError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let listeners = self.inner.registry.snapshot(event);
        if listeners.is_empty() {
            tracing::debug!(bus = self.label(), event = event.name(), "emit without handlers");
            return Ok(0);
        }

        let rt = match &self.inner.runtime {
            Some(rt) => rt.clone(),
            None => Handle::try_current().map_err(|_| BusError::NoRuntime)?,
        };
        let args: Arc<[String]> = args.into_iter().map(Into::into).collect();
        let scheduled =
            self.inner
                .dispatcher
                .dispatch(&rt, event, listeners, Arc::new(data), args);

        tracing::debug!(bus = self.label(), event = event.name(), deliveries = scheduled, "emitted");
        Ok(scheduled)
    }

    /// Waits until every delivery scheduled on this bus has finished.
    ///
    /// Covers all events, not only the last emitted one. Resolves immediately
    /// when nothing is in flight. Deliveries scheduled while waiting extend
    /// the wait.
    ///
    /// Synchronous callers outside a runtime block on it through a handle:
    ///
    /// ```rust
    /// let rt = tokio::runtime::Runtime::new().unwrap();
    /// let bus = eventvisor::Bus::builder(Default::default())
    ///     .with_runtime(rt.handle().clone())
    ///     .build();
    /// rt.block_on(bus.wait());
    /// ```
    pub async fn wait(&self) {
        self.inner.dispatcher.barrier.wait().await;
    }

    /// Finds an event by name without creating it.
    pub fn lookup(&self, name: &str) -> Option<Event> {
        self.inner.registry.lookup(name)
    }

    /// Known events in creation order.
    pub fn events(&self) -> Vec<Event> {
        self.inner.registry.events()
    }

    /// Number of known events.
    pub fn event_count(&self) -> usize {
        self.inner.registry.event_count()
    }

    /// Number of entries in `event`'s handler list (0 if it has none).
    pub fn handler_count(&self, event: &Event) -> usize {
        self.inner.registry.handler_count(event)
    }

    /// True if `event` currently has a handler list.
    pub fn has_handlers(&self, event: &Event) -> bool {
        self.inner.registry.has_handlers(event)
    }

    /// Deliveries scheduled but not yet finished.
    pub fn in_flight(&self) -> usize {
        self.inner.dispatcher.barrier.in_flight()
    }

    /// Handler panics caught under [`PanicPolicy::Isolate`](crate::PanicPolicy::Isolate).
    pub fn panicked(&self) -> u64 {
        self.inner.dispatcher.panicked.load(Ordering::Relaxed)
    }

    /// Configuration this bus was built with.
    pub fn config(&self) -> &BusConfig {
        &self.inner.cfg
    }

    /// Bus label used in logs.
    pub fn label(&self) -> &str {
        &self.inner.cfg.label
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Bus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bus")
            .field("label", &self.label())
            .field("events", &self.event_count())
            .field("in_flight", &self.in_flight())
            .finish()
    }
}
