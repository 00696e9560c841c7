//! # Event handlers for the eventvisor bus.
//!
//! This module provides the [`Handler`] trait, the closure adapters and the
//! [`Listener`] identity wrapper that gets registered on a bus.
//!
//! ## Architecture
//! ```text
//! Handler (trait) ──► Listener { HandlerId, Arc<dyn Handler> } ──► Bus::on / subscribe
//!      ▲                                                             │
//!      ├── HandlerFn   (async closure)                               ▼
//!      ├── BlockingFn  (sync closure, blocking pool)          registry: EventId → [Listener]
//!      └── LogHandler  (feature = "logging")
//! ```
//!
//! ## Implementing custom handlers
//! ```no_run
//! use eventvisor::{Bus, Delivery, EventData, Handler, Listener};
//! use async_trait::async_trait;
//!
//! struct Mailer;
//!
//! #[async_trait]
//! impl Handler for Mailer {
//!     async fn handle(&self, d: Delivery) {
//!         if let Some(to) = d.arg(0) {
//!             // send mail to `to`...
//!             let _ = to;
//!         }
//!     }
//! }
//!
//! # async fn run() -> Result<(), eventvisor::BusError> {
//! let bus = Bus::new();
//! let ev = bus.create_event("user:created");
//! let mailer = Listener::new(Mailer);
//! bus.on(&ev, &mailer);
//! bus.emit(&ev, EventData::new("welcome"), ["alice@example.com"])?;
//! bus.wait().await;
//! # Ok(())
//! # }
//! ```

mod handler;
mod handler_fn;
mod listener;
#[cfg(feature = "logging")]
mod log;

pub use handler::Handler;
pub use handler_fn::{BlockingFn, HandlerFn};
pub use listener::{HandlerId, HandlerRef, Listener};
#[cfg(feature = "logging")]
pub use log::LogHandler;
