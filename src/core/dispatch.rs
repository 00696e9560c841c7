//! # Dispatcher: one independent task per delivery.
//!
//! ## Flow
//! ```text
//! snapshot [L1, L2, ..., LN]   (taken by Bus::emit, lock already released)
//!     │      Arc<EventData>, Arc<[String]> shared by all N deliveries
//!     ├──► barrier.enter() ──► spawn ──► invoke(L1) ──► guard drop
//!     ├──► barrier.enter() ──► spawn ──► invoke(L2) ──► guard drop
//!     └──► barrier.enter() ──► spawn ──► invoke(LN) ──► guard drop
//! ```
//!
//! ## Panic boundary
//! Each invocation runs under `catch_unwind`; what happens next depends on
//! [`PanicPolicy`]:
//! - `Abort`: log at error level and abort the process;
//! - `Isolate`: log at error level, bump the panic counter, finish normally.
//!
//! The barrier guard is released by `Drop` in both cases.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::FutureExt;
use tokio::runtime::Handle;

use crate::core::barrier::{Barrier, BarrierGuard};
use crate::core::config::PanicPolicy;
use crate::error::BusError;
use crate::events::{Delivery, Event, EventData};
use crate::handlers::Listener;

/// Shared pieces every delivery task needs.
#[derive(Clone)]
pub(crate) struct Dispatcher {
    pub(crate) label: Arc<str>,
    pub(crate) policy: PanicPolicy,
    pub(crate) barrier: Arc<Barrier>,
    pub(crate) panicked: Arc<AtomicU64>,
}

impl Dispatcher {
    /// Schedules one delivery per listener on `rt` and returns immediately.
    pub(crate) fn dispatch(
        &self,
        rt: &Handle,
        event: &Event,
        listeners: Vec<Listener>,
        data: Arc<EventData>,
        args: Arc<[String]>,
    ) -> usize {
        let scheduled = listeners.len();
        for listener in listeners {
            let guard = self.barrier.enter();
            let delivery = Delivery::new(event.clone(), Arc::clone(&data), Arc::clone(&args));
            let me = self.clone();
            rt.spawn(async move { me.invoke(listener, delivery, guard).await });
        }
        scheduled
    }

    async fn invoke(self, listener: Listener, delivery: Delivery, guard: BarrierGuard) {
        let _guard = guard;
        let event_name = delivery.event().name().to_string();
        let fut = listener.handler().handle(delivery);

        let Err(panic_err) = AssertUnwindSafe(fut).catch_unwind().await else {
            return;
        };

        let err = BusError::HandlerPanicked {
            handler: listener.name().to_string(),
            event: event_name,
            info: panic_info(&*panic_err),
        };
        match self.policy {
            PanicPolicy::Isolate => {
                self.panicked.fetch_add(1, Ordering::Relaxed);
                tracing::error!(
                    bus = &*self.label,
                    kind = err.as_label(),
                    handler = listener.name(),
                    "{err}"
                );
            }
            PanicPolicy::Abort => {
                tracing::error!(
                    bus = &*self.label,
                    kind = err.as_label(),
                    handler = listener.name(),
                    "{err}; aborting"
                );
                std::process::abort();
            }
        }
    }
}

/// Extracts a printable message from a panic payload.
fn panic_info(any: &(dyn Any + Send)) -> String {
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
