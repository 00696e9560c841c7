//! # Core handler trait
//!
//! `Handler` is the extension point for reacting to emitted events. Every
//! delivery runs as its own Tokio task, so a slow handler never holds up the
//! emitter, the registry, or the other handlers of the same emit.
//!
//! ## Contract
//! - `handle` is called once per delivery; there is no retry.
//! - Implementations should not block the async runtime. Handlers that must
//!   block (sync I/O, heavy CPU) should use [`BlockingFn`](crate::BlockingFn),
//!   which runs on the blocking pool.
//! - A panic is handled according to the bus [`PanicPolicy`](crate::PanicPolicy).
//!
//! ## Example
//! ```rust
//! use eventvisor::{Delivery, Handler};
//! use async_trait::async_trait;
//!
//! struct Audit;
//!
//! #[async_trait]
//! impl Handler for Audit {
//!     async fn handle(&self, delivery: Delivery) {
//!         let _ = (delivery.event().name(), delivery.data().message());
//!     }
//!
//!     fn name(&self) -> &str {
//!         "audit"
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Delivery;

/// Contract for event handlers.
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    /// Handles one delivery.
    async fn handle(&self, delivery: Delivery);

    /// Human-readable name (for logs).
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
