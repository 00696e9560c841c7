//! # Closure-backed handlers
//!
//! Two adapters turn closures into [`Handler`]s:
//!
//! - [`HandlerFn`] wraps `F: Fn(Delivery) -> Fut`, producing a fresh future per
//!   delivery. Shared state goes into an explicit `Arc<...>` captured by the
//!   closure.
//! - [`BlockingFn`] wraps a plain `F: Fn(&EventData, &[String])`, the classic
//!   callback shape. Each call runs on Tokio's blocking pool, so the closure
//!   may sleep or do synchronous I/O.
//!
//! Both hand out a [`Listener`] via `listener(..)`, which is what gets
//! registered on a bus.
//!
//! ## Example
//! ```rust
//! use eventvisor::{BlockingFn, Delivery, HandlerFn, Listener};
//!
//! let async_one: Listener = HandlerFn::listener("printer", |d: Delivery| async move {
//!     let _ = d.arg(0);
//! });
//! let sync_one: Listener = BlockingFn::listener("sync-printer", |data, args| {
//!     let _ = (data.message(), args.len());
//! });
//!
//! assert_eq!(async_one.name(), "printer");
//! assert_ne!(async_one.id(), sync_one.id());
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::events::{Delivery, EventData};

use super::{handler::Handler, listener::Listener};

/// Async closure-backed handler.
#[derive(Debug)]
pub struct HandlerFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> HandlerFn<F> {
    /// Creates a new closure-backed handler.
    ///
    /// Prefer [`HandlerFn::listener`] when you immediately register it.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F, Fut> HandlerFn<F>
where
    F: Fn(Delivery) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    /// Creates the handler and wraps it in a fresh [`Listener`].
    pub fn listener(name: impl Into<Cow<'static, str>>, f: F) -> Listener {
        Listener::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Handler for HandlerFn<F>
where
    F: Fn(Delivery) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn handle(&self, delivery: Delivery) {
        (self.f)(delivery).await;
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Synchronous closure-backed handler run on the blocking pool.
#[derive(Debug)]
pub struct BlockingFn<F> {
    name: Cow<'static, str>,
    f: Arc<F>,
}

impl<F> BlockingFn<F> {
    /// Creates a new blocking handler.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f: Arc::new(f),
        }
    }
}

impl<F> BlockingFn<F>
where
    F: Fn(&EventData, &[String]) + Send + Sync + 'static,
{
    /// Creates the handler and wraps it in a fresh [`Listener`].
    pub fn listener(name: impl Into<Cow<'static, str>>, f: F) -> Listener {
        Listener::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F> Handler for BlockingFn<F>
where
    F: Fn(&EventData, &[String]) + Send + Sync + 'static,
{
    async fn handle(&self, delivery: Delivery) {
        let f = Arc::clone(&self.f);
        let joined =
            tokio::task::spawn_blocking(move || (*f)(delivery.data(), delivery.args())).await;

        // Re-raise on this task so the bus panic policy sees it.
        if let Err(err) = joined {
            if err.is_panic() {
                std::panic::resume_unwind(err.into_panic());
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
