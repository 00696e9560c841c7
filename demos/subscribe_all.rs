//! # Subscribe Example
//!
//! Bulk attachment with `subscribe`:
//! - with no targets the listener joins every event created so far;
//! - with targets it joins only events that already have a handler.
//!
//! ## Run
//! ```bash
//! cargo run --example subscribe_all
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use eventvisor::{Bus, Delivery, EventData, HandlerFn, Listener};

fn tally(name: &'static str, hits: &Arc<AtomicUsize>) -> Listener {
    let hits = Arc::clone(hits);
    HandlerFn::listener(name, move |d: Delivery| {
        let hits = Arc::clone(&hits);
        async move {
            hits.fetch_add(1, Ordering::Relaxed);
            println!(" ├─► {name} saw {}", d.event());
        }
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eventvisor=debug".into()),
        )
        .init();

    let bus = Bus::new();
    let events: Vec<_> = ["order:placed", "order:paid", "order:shipped"]
        .into_iter()
        .map(|name| bus.create_event(name))
        .collect();

    let all_hits = Arc::new(AtomicUsize::new(0));
    let attached = bus.subscribe(&tally("audit", &all_hits), &[]);
    println!("audit attached to {attached} events");

    let paid_hits = Arc::new(AtomicUsize::new(0));
    bus.on(&events[1], &tally("billing", &paid_hits));

    // Created after the audit subscribe, so it has no handler list yet.
    let fresh = bus.create_event("order:refunded");
    let targeted_hits = Arc::new(AtomicUsize::new(0));
    let attached = bus.subscribe(
        &tally("finance", &targeted_hits),
        &[events[1].clone(), fresh.clone()],
    );
    println!("finance attached to {attached} of 2 targets");

    for event in events.iter().chain([&fresh]) {
        bus.emit(event, EventData::new("tick"), Vec::<String>::new())?;
    }
    bus.wait().await;

    println!();
    println!("Totals:");
    println!(" ├─► audit:   {}", all_hits.load(Ordering::Relaxed));
    println!(" ├─► billing: {}", paid_hits.load(Ordering::Relaxed));
    println!(" └─► finance: {}", targeted_hits.load(Ordering::Relaxed));
    Ok(())
}
