//! # Bus configuration.
//!
//! Provides [`BusConfig`], the settings a bus is built with, and
//! [`PanicPolicy`], which decides what a panicking handler does to the process.
//!
//! Config is used through [`Bus::builder`](crate::Bus::builder); `Bus::new()`
//! and `Bus::global()` use `BusConfig::default()`.

use std::borrow::Cow;

/// What happens when a handler panics during delivery.
///
/// Every delivery is an independent task with no supervisor above it. The
/// async runtime would silently swallow a panicking task, so the bus makes the
/// outcome explicit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PanicPolicy {
    /// Log the panic, then abort the whole process.
    #[default]
    Abort,

    /// Catch the panic at the delivery boundary, log it as
    /// [`BusError::HandlerPanicked`](crate::BusError::HandlerPanicked) and
    /// count it. Other deliveries are unaffected.
    Isolate,
}

/// Configuration for an event bus.
///
/// ## Field semantics
/// - `label`: name used in log records (`bus=` field); purely informational
/// - `panic_policy`: see [`PanicPolicy`]
#[derive(Clone, Debug)]
pub struct BusConfig {
    /// Bus name attached to every log record emitted by this bus.
    pub label: Cow<'static, str>,

    /// Handler panic behavior.
    pub panic_policy: PanicPolicy,
}

impl BusConfig {
    /// Returns the default config with the given label.
    pub fn labeled(label: impl Into<Cow<'static, str>>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// True if handler panics are caught instead of aborting.
    #[inline]
    pub fn isolates_panics(&self) -> bool {
        matches!(self.panic_policy, PanicPolicy::Isolate)
    }
}

impl Default for BusConfig {
    /// Default configuration:
    ///
    /// - `label = "eventvisor"`
    /// - `panic_policy = PanicPolicy::Abort`
    fn default() -> Self {
        Self {
            label: Cow::Borrowed("eventvisor"),
            panic_policy: PanicPolicy::default(),
        }
    }
}
