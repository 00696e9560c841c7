//! Error types used by the eventvisor bus.
//!
//! The bus favors silent no-ops over errors: detaching an unknown handler,
//! emitting an event nobody listens to, or subscribing to an event without
//! prior registrations all succeed quietly. [`BusError`] covers what remains:
//!
//! - an emit that cannot reach a Tokio runtime;
//! - payload access with the wrong type;
//! - handler panics caught under [`PanicPolicy::Isolate`](crate::PanicPolicy::Isolate).
//!
//! `as_label` and `as_message` give stable strings for log fields.

use thiserror::Error;

/// # Errors produced by the event bus.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BusError {
    /// `emit` was called outside of a Tokio runtime and the bus was not built
    /// with an explicit runtime handle.
    #[error("no tokio runtime available for dispatch")]
    NoRuntime,

    /// The event data carries no payload.
    #[error("event data has no payload")]
    PayloadMissing,

    /// The payload is present but holds a different type.
    #[error("payload is not of type {expected}")]
    PayloadMismatch {
        /// Name of the requested type.
        expected: &'static str,
    },

    /// A handler panicked during delivery and the panic was caught.
    #[error("handler '{handler}' panicked on event '{event}': {info}")]
    HandlerPanicked {
        /// Handler name as reported by [`Handler::name`](crate::Handler::name).
        handler: String,
        /// Name of the event being delivered.
        event: String,
        /// Panic message, or `"unknown panic"` for non-string payloads.
        info: String,
    },
}

impl BusError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use eventvisor::BusError;
    ///
    /// let err = BusError::PayloadMismatch { expected: "u32" };
    /// assert_eq!(err.as_label(), "payload_mismatch");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            BusError::NoRuntime => "bus_no_runtime",
            BusError::PayloadMissing => "payload_missing",
            BusError::PayloadMismatch { .. } => "payload_mismatch",
            BusError::HandlerPanicked { .. } => "handler_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            BusError::NoRuntime => "dispatch requires a tokio runtime".to_string(),
            BusError::PayloadMissing => "no payload".to_string(),
            BusError::PayloadMismatch { expected } => format!("expected payload type {expected}"),
            BusError::HandlerPanicked {
                handler,
                event,
                info,
            } => format!("handler={handler} event={event} panic={info}"),
        }
    }

    /// Indicates whether the error came from user handler code rather than
    /// from the bus itself.
    pub fn is_handler_fault(&self) -> bool {
        matches!(self, BusError::HandlerPanicked { .. })
    }
}
