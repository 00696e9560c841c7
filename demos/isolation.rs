//! # Panic Isolation Example
//!
//! A bus built with `PanicPolicy::Isolate` logs and counts handler panics
//! instead of aborting the process. The `LogHandler` records every delivery.
//!
//! ## Run
//! ```bash
//! cargo run --example isolation --features logging
//! ```

use eventvisor::{Bus, BusConfig, Delivery, EventData, HandlerFn, LogHandler, PanicPolicy};

async fn flaky(d: Delivery) {
    if d.arg(0) == Some("bad") {
        panic!("refusing input {:?}", d.data().message());
    }
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut cfg = BusConfig::labeled("isolation-demo");
    cfg.panic_policy = PanicPolicy::Isolate;
    let bus = Bus::builder(cfg).build();

    let job = bus.create_event("job:submitted");
    bus.on(&job, &HandlerFn::listener("flaky", flaky));
    bus.subscribe(&LogHandler::listener(), &[]);

    for (i, arg) in ["ok", "bad", "ok", "bad"].into_iter().enumerate() {
        bus.emit(&job, EventData::new(format!("job-{i}")), [arg])?;
    }
    bus.wait().await;

    println!("in flight: {}", bus.in_flight());
    println!("panicked:  {}", bus.panicked());
    Ok(())
}
