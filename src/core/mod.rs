//! Bus core: registry, dispatch and the completion barrier.
//!
//! The only public API from this module is [`Bus`] (with [`BusBuilder`],
//! [`BusConfig`] and [`PanicPolicy`]).
//!
//! Internal modules:
//! - [`registry`]: known events and attached listeners behind one mutex;
//! - [`dispatch`]: spawns one task per delivery and applies the panic policy;
//! - [`barrier`]: bus-wide in-flight counter behind `wait()`;
//! - [`bus`]: the public facade wiring the three together.

mod barrier;
mod builder;
mod bus;
mod config;
mod dispatch;
mod registry;

pub use builder::BusBuilder;
pub use bus::Bus;
pub use config::{BusConfig, PanicPolicy};
