//! # LogHandler: records every delivery through `tracing`
//!
//! A minimal handler meant for demos and debugging. Subscribe it to every
//! event with `bus.subscribe(&LogHandler::listener(), &[])`.
//!
//! ## Example output
//! ```text
//! INFO eventvisor::handlers::log: delivery event="user:created" message="hello" args=["alice"] payload=true
//! ```

use async_trait::async_trait;

use crate::events::Delivery;
use crate::handlers::{Handler, Listener};

/// Delivery logger.
#[derive(Default)]
pub struct LogHandler;

impl LogHandler {
    /// Construct a new [`LogHandler`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Construct a [`LogHandler`] wrapped in a fresh listener.
    #[must_use]
    pub fn listener() -> Listener {
        Listener::new(Self)
    }
}

#[async_trait]
impl Handler for LogHandler {
    async fn handle(&self, d: Delivery) {
        tracing::info!(
            event = d.event().name(),
            message = d.data().message(),
            args = ?d.args(),
            payload = d.data().has_payload(),
            "delivery"
        );
    }

    fn name(&self) -> &str {
        "LogHandler"
    }
}
