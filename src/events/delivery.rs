//! # Delivery: what a handler receives.
//!
//! One [`Delivery`] is built per handler per emit. The data and the argument
//! list are allocated once per emit and shared between all deliveries of it.

use std::sync::Arc;

use super::{data::EventData, event::Event};

/// A single scheduled invocation's input.
///
/// Cheap to clone (three reference-counted fields).
#[derive(Clone, Debug)]
pub struct Delivery {
    event: Event,
    data: Arc<EventData>,
    args: Arc<[String]>,
}

impl Delivery {
    pub(crate) fn new(event: Event, data: Arc<EventData>, args: Arc<[String]>) -> Self {
        Self { event, data, args }
    }

    /// The event that was emitted.
    #[inline]
    pub fn event(&self) -> &Event {
        &self.event
    }

    /// The emitted data, identical for every handler of this emit.
    #[inline]
    pub fn data(&self) -> &EventData {
        &self.data
    }

    /// Shared handle to the emitted data.
    #[inline]
    pub fn shared_data(&self) -> Arc<EventData> {
        Arc::clone(&self.data)
    }

    /// Positional string arguments passed to `emit`.
    #[inline]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Positional argument `index`, if present.
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }
}
