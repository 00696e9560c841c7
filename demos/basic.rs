//! # Basic Example
//!
//! Registers two events, attaches async and blocking handlers, emits with a
//! payload and positional arguments, then waits for every delivery.
//!
//! Shows:
//! - `create_event` is idempotent (same name, same event)
//! - `on` / `off` with handler ids
//! - typed payload access with `decode_payload`
//! - `wait` joins deliveries of all events
//!
//! ## Run
//! ```bash
//! cargo run --example basic
//! ```

use std::time::Duration;

use eventvisor::{BlockingFn, Bus, Delivery, EventData, HandlerFn, decode_payload};

#[derive(Clone, Debug)]
struct User {
    name: String,
    age: u32,
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eventvisor=debug".into()),
        )
        .init();

    let bus = Bus::new();
    let created = bus.create_event("user:created");
    let deleted = bus.create_event("user:deleted");
    assert_eq!(created, bus.create_event("user:created"));

    let greeter = HandlerFn::listener("greeter", |d: Delivery| async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        match d.data().payload::<User>() {
            Some(user) => println!(" ├─► greeter:  hello {} ({})", user.name, user.age),
            None => println!(" ├─► greeter:  no user in '{}'", d.data().message()),
        }
    });

    let auditor = BlockingFn::listener("auditor", |data, args| {
        let user: Option<User> = decode_payload(data);
        let name = user.map(|u| u.name).unwrap_or_default();
        println!(" ├─► auditor:  {} user={name:?} source={:?}", data.message(), args.first());
    });

    let greeter_id = bus.on(&created, &greeter);
    bus.on(&created, &auditor);
    bus.on(&deleted, &auditor);

    let alice = User {
        name: "alice".into(),
        age: 31,
    };

    println!("emit user:created");
    let n = bus.emit(
        &created,
        EventData::new("created").with_payload(alice.clone()),
        ["web"],
    )?;
    println!(" ├─► scheduled {n} deliveries");
    bus.emit(&deleted, EventData::new("deleted").with_payload(alice), ["admin"])?;
    bus.wait().await;
    println!(" └─► all deliveries finished");

    println!("off greeter, emit again");
    bus.off(&created, greeter_id);
    let n = bus.emit(&created, EventData::new("created again"), ["cli"])?;
    bus.wait().await;
    println!(" └─► {n} delivery (auditor only)");

    Ok(())
}
