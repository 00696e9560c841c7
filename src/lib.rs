//! # eventvisor
//!
//! **Eventvisor** is a lightweight in-process event bus for Rust.
//!
//! Callers register named events, attach handlers to them, and emit data to
//! every attached handler. Each delivery runs as its own Tokio task, the
//! registry is never locked while handler code runs, and a single `wait()`
//! joins every outstanding delivery of the bus.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  Listener A  │   │  Listener B  │   │  Listener C  │
//!     │ (HandlerId 1)│   │ (HandlerId 2)│   │ (HandlerId 3)│
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            │ on / subscribe   │                  │
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Bus                                                              │
//! │  - Registry  (Mutex: events in creation order,                    │
//! │               EventId → [Listener] in registration order)         │
//! │  - Dispatcher (snapshot → one task per listener)                  │
//! │  - Barrier   (watch-based in-flight counter, bus-wide)            │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        │ emit(ev, data, args): snapshot under lock, spawn after unlock
//!        ▼                  ▼                  ▼
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │ delivery task│   │ delivery task│   │ delivery task│
//!     │ handle(d)    │   │ handle(d)    │   │ handle(d)    │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            └── guard drop ────┴── guard drop ────┘
//!                               ▼
//!                     Barrier count → 0 ──► wait() resolves
//! ```
//!
//! ### Lifecycle of one emit
//! ```text
//! emit(ev, data, args)
//!   ├─► lock registry, clone ev's listener list, unlock
//!   ├─► empty? ──► Ok(0)
//!   ├─► resolve runtime (pinned handle or current) ──► none? Err(NoRuntime)
//!   ├─► Arc<EventData>, Arc<[String]> shared by all deliveries
//!   └─► for each listener:
//!         ├─► barrier.enter()
//!         └─► spawn: handle(delivery) under catch_unwind
//!                ├─ Ok         ─► guard drop
//!                └─ panic      ─► PanicPolicy::Abort   ─► log, abort process
//!                                 PanicPolicy::Isolate ─► log, count, guard drop
//! ```
//!
//! ## Features
//! | Area              | Description                                                     | Key types / traits                          |
//! |-------------------|-----------------------------------------------------------------|---------------------------------------------|
//! | **Bus**           | Create events, attach/detach, emit, wait, bulk subscribe.       | [`Bus`], [`BusBuilder`]                     |
//! | **Handlers**      | Async and blocking closures or custom types, identity by token. | [`Handler`], [`HandlerFn`], [`BlockingFn`], [`Listener`] |
//! | **Data**          | Message plus opaque payload, typed access.                      | [`EventData`], [`Delivery`], [`decode_payload`] |
//! | **Errors**        | Typed errors for the few real failure modes.                    | [`BusError`]                                |
//! | **Configuration** | Bus label and handler panic policy.                             | [`BusConfig`], [`PanicPolicy`]              |
//!
//! ## Optional features
//! - `logging`: exports [`LogHandler`], which records every delivery through `tracing`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use eventvisor::{Bus, BlockingFn, EventData, decode_payload};
//!
//! #[tokio::main(flavor = "multi_thread", worker_threads = 2)]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bus = Bus::new();
//!     let created = bus.create_event("user:created");
//!
//!     let greeted = Arc::new(AtomicUsize::new(0));
//!     let g = Arc::clone(&greeted);
//!     let greeter = BlockingFn::listener("greeter", move |data, args| {
//!         let user: String = decode_payload(data).unwrap_or_default();
//!         println!("{}: {user} {args:?}", data.message());
//!         g.fetch_add(1, Ordering::SeqCst);
//!     });
//!
//!     let id = bus.on(&created, &greeter);
//!     bus.emit(&created, EventData::new("welcome").with_payload("alice".to_string()), ["web"])?;
//!     bus.wait().await;
//!     assert_eq!(greeted.load(Ordering::SeqCst), 1);
//!
//!     bus.off(&created, id);
//!     assert_eq!(bus.emit(&created, EventData::new("nobody listens"), ["web"])?, 0);
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod handlers;

// ---- Public re-exports ----

pub use core::{Bus, BusBuilder, BusConfig, PanicPolicy};
pub use error::BusError;
pub use events::{Delivery, Event, EventData, EventId, decode_payload};
pub use handlers::{BlockingFn, Handler, HandlerFn, HandlerId, HandlerRef, Listener};

// Optional: a simple built-in delivery logger (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use handlers::LogHandler;
