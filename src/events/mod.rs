//! Event data model: identities, data envelope, per-handler delivery.
//!
//! ## Contents
//! - [`Event`], [`EventId`] named channel and its identity
//! - [`EventData`], [`decode_payload`] message + opaque payload, typed access
//! - [`Delivery`] what one handler invocation receives
//!
//! The registry that creates events and the dispatcher that builds deliveries
//! live in `core/`.

mod data;
mod delivery;
mod event;

pub use data::{EventData, decode_payload};
pub use delivery::Delivery;
pub use event::{Event, EventId};
