//! # Event data envelope and payload access.
//!
//! [`EventData`] is what an emitter hands to [`Bus::emit`](crate::Bus::emit):
//! a short message plus an optional payload of any `Send + Sync` type. The bus
//! wraps it in an `Arc` once per emit, so every handler of that emit sees the
//! very same value.
//!
//! Payload access never panics:
//! - [`EventData::payload`] borrows the payload as `T` if it is one;
//! - [`EventData::try_payload`] says why it is not;
//! - [`decode_payload`] clones it out, `None` on mismatch.
//!
//! ## Example
//! ```rust
//! use eventvisor::{EventData, decode_payload};
//!
//! let data = EventData::new("greeting").with_payload(String::from("test"));
//!
//! assert_eq!(decode_payload::<String>(&data).as_deref(), Some("test"));
//! assert_eq!(decode_payload::<u64>(&data), None);
//! ```

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use crate::error::BusError;

/// Message plus optional opaque payload, delivered unchanged to every handler.
#[derive(Clone, Default)]
pub struct EventData {
    message: String,
    payload: Option<Arc<dyn Any + Send + Sync>>,
}

impl EventData {
    /// Creates data with a message and no payload.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            payload: None,
        }
    }

    /// Attaches (or replaces) the payload.
    pub fn with_payload<T>(mut self, payload: T) -> Self
    where
        T: Any + Send + Sync,
    {
        self.payload = Some(Arc::new(payload));
        self
    }

    /// Attaches an already shared payload without re-allocating it.
    pub fn with_shared_payload(mut self, payload: Arc<dyn Any + Send + Sync>) -> Self {
        self.payload = Some(payload);
        self
    }

    /// The message string.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// True if a payload is attached.
    #[inline]
    pub fn has_payload(&self) -> bool {
        self.payload.is_some()
    }

    /// Borrows the payload as `T`, or `None` if it is absent or of another type.
    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.payload.as_deref().and_then(|p| p.downcast_ref::<T>())
    }

    /// Borrows the payload as `T`, reporting why that is not possible.
    ///
    /// # Errors
    /// - [`BusError::PayloadMissing`] when no payload is attached;
    /// - [`BusError::PayloadMismatch`] when it holds another type.
    pub fn try_payload<T: Any>(&self) -> Result<&T, BusError> {
        let payload = self.payload.as_deref().ok_or(BusError::PayloadMissing)?;
        payload
            .downcast_ref::<T>()
            .ok_or(BusError::PayloadMismatch {
                expected: type_name::<T>(),
            })
    }
}

impl fmt::Debug for EventData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventData")
            .field("message", &self.message)
            .field("has_payload", &self.payload.is_some())
            .finish()
    }
}

/// Decodes the payload of `data` into an owned `T`.
///
/// Returns `None` when there is no payload or it holds a different type;
/// callers wanting a zero value use `unwrap_or_default()`.
pub fn decode_payload<T>(data: &EventData) -> Option<T>
where
    T: Any + Clone,
{
    data.payload::<T>().cloned()
}
