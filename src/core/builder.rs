use tokio::runtime::Handle;

use super::{bus::Bus, config::BusConfig};

/// Builder for constructing a [`Bus`] with optional settings.
pub struct BusBuilder {
    cfg: BusConfig,
    runtime: Option<Handle>,
}

impl BusBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: BusConfig) -> Self {
        Self { cfg, runtime: None }
    }

    /// Pins deliveries to the given runtime.
    ///
    /// Without it, `emit` spawns onto the runtime of the calling thread and
    /// fails with [`BusError::NoRuntime`](crate::BusError::NoRuntime) outside
    /// of one. With it, `emit` works from any thread.
    pub fn with_runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Builds the bus.
    ///
    /// Nothing is spawned here; the bus is inert until the first `emit`.
    pub fn build(self) -> Bus {
        Bus::from_parts(self.cfg, self.runtime)
    }
}
