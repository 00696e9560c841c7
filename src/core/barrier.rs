//! # Completion barrier: bus-wide count of in-flight deliveries.
//!
//! ## Architecture
//! ```text
//! emit() ──► Barrier::enter() ──► count += 1 ──► guard moved into the delivery task
//!                                                     │
//!                         delivery finishes / panics  ▼
//!                                               guard dropped ──► count -= 1
//!
//! wait() ──► watch::Receiver::wait_for(count == 0)
//! ```
//!
//! ## Rules
//! - The count lives in a `tokio::sync::watch` channel, synchronized on its own
//!   and never through the registry lock.
//! - Increments happen on the emitting thread **before** the task is spawned,
//!   so a `wait()` that starts after `emit()` returned always observes it.
//! - Decrements happen in `Drop`, so unwinding and runtime shutdown release the
//!   slot as well.
//! - The count never goes below zero.

use std::sync::Arc;

use tokio::sync::watch;

/// Shared counter of outstanding deliveries with an async "reached zero" wait.
#[derive(Debug)]
pub(crate) struct Barrier {
    count: watch::Sender<usize>,
}

impl Barrier {
    /// Creates a barrier with nothing in flight.
    pub(crate) fn new() -> Arc<Self> {
        let (count, _rx) = watch::channel(0usize);
        Arc::new(Self { count })
    }

    /// Registers one outstanding delivery; released when the guard drops.
    pub(crate) fn enter(self: &Arc<Self>) -> BarrierGuard {
        self.count.send_modify(|n| *n += 1);
        BarrierGuard {
            barrier: Arc::clone(self),
        }
    }

    /// Current number of outstanding deliveries.
    pub(crate) fn in_flight(&self) -> usize {
        *self.count.borrow()
    }

    /// Resolves once no delivery is outstanding.
    ///
    /// Returns immediately when the count is already zero.
    pub(crate) async fn wait(&self) {
        let mut rx = self.count.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|n| *n == 0).await;
    }

    fn leave(&self) {
        self.count.send_modify(|n| {
            debug_assert!(*n > 0, "barrier released more often than entered");
            *n = n.saturating_sub(1);
        });
    }
}

/// Holds one slot of the barrier for the duration of a delivery.
#[derive(Debug)]
pub(crate) struct BarrierGuard {
    barrier: Arc<Barrier>,
}

impl Drop for BarrierGuard {
    fn drop(&mut self) {
        self.barrier.leave();
    }
}
