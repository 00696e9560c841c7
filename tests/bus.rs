use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use eventvisor::{
    BlockingFn, Bus, BusConfig, Delivery, EventData, HandlerFn, Listener, PanicPolicy,
    decode_payload,
};
use tokio::sync::Notify;

fn counting(name: &'static str, hits: &Arc<AtomicUsize>) -> Listener {
    let hits = Arc::clone(hits);
    HandlerFn::listener(name, move |_d: Delivery| {
        let hits = Arc::clone(&hits);
        async move {
            hits.fetch_add(1, Ordering::SeqCst);
        }
    })
}

fn no_args() -> Vec<String> {
    Vec::new()
}

#[tokio::test]
async fn create_event_returns_same_event_for_same_name() {
    let bus = Bus::new();

    let ev1 = bus.create_event("test:event");
    let ev2 = bus.create_event("test:event");

    assert_eq!(ev1, ev2);
    assert_eq!(ev1.id(), ev2.id());
    assert_eq!(bus.event_count(), 1);

    bus.create_event("test:other");
    bus.create_event("test:event");
    assert_eq!(bus.event_count(), 2);
}

#[tokio::test]
async fn on_registers_handler() {
    let bus = Bus::new();
    let event = bus.create_event("on:event");
    let hits = Arc::new(AtomicUsize::new(0));

    bus.on(&event, &counting("h", &hits));
    bus.emit(&event, EventData::new("Hello"), no_args()).unwrap();
    bus.wait().await;

    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn same_listener_attached_twice_runs_once() {
    let bus = Bus::new();
    let event = bus.create_event("dedupe:event");
    let hits = Arc::new(AtomicUsize::new(0));
    let listener = counting("h", &hits);

    let first = bus.on(&event, &listener);
    let second = bus.on(&event, &listener.clone());
    assert_eq!(first, second);
    assert_eq!(bus.handler_count(&event), 1);

    assert_eq!(bus.emit(&event, EventData::default(), no_args()), Ok(1));
    bus.wait().await;
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn distinct_listeners_over_same_closure_are_not_deduplicated() {
    let bus = Bus::new();
    let event = bus.create_event("closures:event");
    let hits = Arc::new(AtomicUsize::new(0));

    let h = Arc::clone(&hits);
    let body = move |_d: Delivery| {
        let h = Arc::clone(&h);
        async move {
            h.fetch_add(1, Ordering::SeqCst);
        }
    };
    bus.on(&event, &HandlerFn::listener("a", body.clone()));
    bus.on(&event, &HandlerFn::listener("b", body));

    bus.emit(&event, EventData::default(), no_args()).unwrap();
    bus.wait().await;
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn emit_calls_all_handlers() {
    let bus = Bus::new();
    let event = bus.create_event("multi:handler");
    let hits = Arc::new(AtomicUsize::new(0));

    const N: usize = 16;
    for _ in 0..N {
        bus.on(&event, &counting("h", &hits));
    }

    assert_eq!(
        bus.emit(&event, EventData::new("Event triggered"), no_args()),
        Ok(N)
    );
    bus.wait().await;
    assert_eq!(hits.load(Ordering::SeqCst), N);
    assert_eq!(bus.in_flight(), 0);
}

#[tokio::test]
async fn off_removes_handler() {
    let bus = Bus::new();
    let event = bus.create_event("off:event");
    let hits = Arc::new(AtomicUsize::new(0));
    let listener = counting("h", &hits);

    let id = bus.on(&event, &listener);
    bus.off(&event, id);
    assert!(!bus.has_handlers(&event));

    assert_eq!(
        bus.emit(&event, EventData::new("Should not be called"), no_args()),
        Ok(0)
    );
    bus.wait().await;
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn off_keeps_other_handlers() {
    let bus = Bus::new();
    let event = bus.create_event("off:partial");
    let removed_hits = Arc::new(AtomicUsize::new(0));
    let kept_hits = Arc::new(AtomicUsize::new(0));

    let removed = bus.on(&event, &counting("removed", &removed_hits));
    bus.on(&event, &counting("kept", &kept_hits));
    bus.off(&event, removed);
    assert_eq!(bus.handler_count(&event), 1);

    bus.emit(&event, EventData::default(), no_args()).unwrap();
    bus.wait().await;
    assert_eq!(removed_hits.load(Ordering::SeqCst), 0);
    assert_eq!(kept_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn off_for_unknown_handler_or_event_is_noop() {
    let bus = Bus::new();
    let known = bus.create_event("off:known");
    let never_used = bus.create_event("off:never-used");
    let hits = Arc::new(AtomicUsize::new(0));
    let listener = counting("h", &hits);
    let stranger = counting("stranger", &hits);

    bus.on(&known, &listener);
    bus.off(&known, stranger.id());
    bus.off(&never_used, listener.id());

    assert_eq!(bus.handler_count(&known), 1);
    assert!(!bus.has_handlers(&never_used));
}

#[tokio::test]
async fn emit_passes_arguments() {
    let bus = Bus::new();
    let event = bus.create_event("args:event");
    let received = Arc::new(Mutex::new(Vec::<String>::new()));

    let r = Arc::clone(&received);
    bus.on(
        &event,
        &HandlerFn::listener("args", move |d: Delivery| {
            let r = Arc::clone(&r);
            async move {
                if let Some(first) = d.arg(0) {
                    r.lock().unwrap().push(first.to_string());
                }
            }
        }),
    );
    let r = Arc::clone(&received);
    bus.on(
        &event,
        &HandlerFn::listener("args-2", move |d: Delivery| {
            let r = Arc::clone(&r);
            async move {
                r.lock().unwrap().push(d.args().join("|"));
            }
        }),
    );

    bus.emit(&event, EventData::default(), ["Doni", "second"])
        .unwrap();
    bus.wait().await;

    let mut got = received.lock().unwrap().clone();
    got.sort();
    assert_eq!(got, vec!["Doni".to_string(), "Doni|second".to_string()]);
}

#[tokio::test]
async fn every_handler_sees_the_same_data() {
    let bus = Bus::new();
    let event = bus.create_event("data:shared");
    let seen = Arc::new(Mutex::new(Vec::new()));

    for name in ["a", "b", "c"] {
        let s = Arc::clone(&seen);
        bus.on(
            &event,
            &HandlerFn::listener(name, move |d: Delivery| {
                let s = Arc::clone(&s);
                async move {
                    let ptr = Arc::as_ptr(&d.shared_data()) as usize;
                    let msg = d.data().message().to_string();
                    let payload = decode_payload::<u32>(d.data());
                    s.lock().unwrap().push((ptr, msg, payload));
                }
            }),
        );
    }

    bus.emit(&event, EventData::new("m").with_payload(7u32), no_args())
        .unwrap();
    bus.wait().await;

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 3);
    assert!(seen.iter().all(|(ptr, msg, payload)| {
        *ptr == seen[0].0 && msg == "m" && *payload == Some(7)
    }));
}

#[tokio::test]
async fn emit_is_asynchronous_and_wait_joins() {
    let bus = Bus::new();
    let event = bus.create_event("async:event");
    let done = Arc::new(AtomicUsize::new(0));
    const D: Duration = Duration::from_millis(50);

    let d = Arc::clone(&done);
    bus.on(
        &event,
        &HandlerFn::listener("sleeper", move |_d: Delivery| {
            let d = Arc::clone(&d);
            async move {
                tokio::time::sleep(D).await;
                d.fetch_add(1, Ordering::SeqCst);
            }
        }),
    );

    let start = Instant::now();
    bus.emit(&event, EventData::default(), no_args()).unwrap();
    assert!(start.elapsed() < D);
    assert_eq!(done.load(Ordering::SeqCst), 0);
    assert_eq!(bus.in_flight(), 1);

    bus.wait().await;
    assert!(start.elapsed() >= D);
    assert_eq!(done.load(Ordering::SeqCst), 1);
    assert_eq!(bus.in_flight(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn blocking_handler_is_asynchronous_too() {
    let bus = Bus::new();
    let event = bus.create_event("async:blocking");
    let done = Arc::new(AtomicUsize::new(0));
    const D: Duration = Duration::from_millis(50);

    let d = Arc::clone(&done);
    bus.on(
        &event,
        &BlockingFn::listener("sync-sleeper", move |_data, _args| {
            std::thread::sleep(D);
            d.fetch_add(1, Ordering::SeqCst);
        }),
    );

    let start = Instant::now();
    bus.emit(&event, EventData::default(), no_args()).unwrap();
    assert!(start.elapsed() < D);

    bus.wait().await;
    assert!(start.elapsed() >= D);
    assert_eq!(done.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn wait_without_deliveries_returns_immediately() {
    let bus = Bus::new();
    tokio::time::timeout(Duration::from_millis(100), bus.wait())
        .await
        .expect("idle bus must not block");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn wait_joins_deliveries_of_all_events() {
    let bus = Bus::new();
    let slow = bus.create_event("join:slow");
    let fast = bus.create_event("join:fast");
    let hits = Arc::new(AtomicUsize::new(0));

    let h = Arc::clone(&hits);
    bus.on(
        &slow,
        &HandlerFn::listener("slow", move |_d: Delivery| {
            let h = Arc::clone(&h);
            async move {
                tokio::time::sleep(Duration::from_millis(60)).await;
                h.fetch_add(1, Ordering::SeqCst);
            }
        }),
    );
    bus.on(&fast, &counting("fast", &hits));

    bus.emit(&slow, EventData::default(), no_args()).unwrap();
    bus.emit(&fast, EventData::default(), no_args()).unwrap();
    bus.wait().await;

    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn separate_buses_are_isolated() {
    let a = Bus::new();
    let b = Bus::new();

    let ev_a = a.create_event("shared:name");
    let ev_b = b.create_event("shared:name");
    assert_ne!(ev_a, ev_b);

    let gate = Arc::new(Notify::new());
    let g = Arc::clone(&gate);
    a.on(
        &ev_a,
        &HandlerFn::listener("gated", move |_d: Delivery| {
            let g = Arc::clone(&g);
            async move { g.notified().await }
        }),
    );
    a.emit(&ev_a, EventData::default(), no_args()).unwrap();

    // b has nothing in flight even though a does.
    assert_eq!(b.emit(&ev_b, EventData::default(), no_args()), Ok(0));
    tokio::time::timeout(Duration::from_millis(100), b.wait())
        .await
        .expect("other bus must not wait for a");
    assert_eq!(a.in_flight(), 1);

    gate.notify_one();
    a.wait().await;
    assert_eq!(a.in_flight(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn registry_stays_usable_while_handlers_run() {
    let bus = Bus::new();
    let event = bus.create_event("busy:event");
    let gate = Arc::new(Notify::new());
    let started = Arc::new(Notify::new());

    let (g, s) = (Arc::clone(&gate), Arc::clone(&started));
    let blocker = HandlerFn::listener("blocker", move |_d: Delivery| {
        let (g, s) = (Arc::clone(&g), Arc::clone(&s));
        async move {
            s.notify_one();
            g.notified().await;
        }
    });
    let blocker_id = bus.on(&event, &blocker);
    bus.emit(&event, EventData::default(), no_args()).unwrap();
    started.notified().await;

    // All of these take the registry lock while the delivery is parked.
    let hits = Arc::new(AtomicUsize::new(0));
    let other = bus.create_event("busy:other");
    let late = counting("late", &hits);
    bus.on(&event, &late);
    bus.on(&other, &late);
    bus.off(&event, blocker_id);
    assert_eq!(bus.subscribe(&late, &[other.clone()]), 1);
    assert_eq!(bus.handler_count(&event), 1);
    assert_eq!(bus.in_flight(), 1);

    gate.notify_one();
    bus.wait().await;
    // Snapshot semantics: `late` joined after the emit and did not run.
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_emitters_are_all_counted() {
    let bus = Bus::new();
    let event = bus.create_event("concurrent:event");
    let hits = Arc::new(AtomicUsize::new(0));
    bus.on(&event, &counting("one", &hits));
    bus.on(&event, &counting("two", &hits));

    const EMITTERS: usize = 8;
    const PER_EMITTER: usize = 50;
    let mut joins = Vec::new();
    for i in 0..EMITTERS {
        let bus = bus.clone();
        let event = event.clone();
        joins.push(tokio::spawn(async move {
            for j in 0..PER_EMITTER {
                bus.emit(&event, EventData::new(format!("{i}-{j}")), no_args())
                    .unwrap();
            }
        }));
    }
    for j in joins {
        j.await.unwrap();
    }

    bus.wait().await;
    assert_eq!(hits.load(Ordering::SeqCst), EMITTERS * PER_EMITTER * 2);
}

#[tokio::test]
async fn subscribe_without_targets_attaches_to_every_event() {
    let bus = Bus::new();
    let names = ["event:one", "event:two", "event:three"];
    let events: Vec<_> = names.iter().map(|n| bus.create_event(*n)).collect();
    let hits = Arc::new(AtomicUsize::new(0));

    assert_eq!(bus.subscribe(&counting("all", &hits), &[]), events.len());

    for event in &events {
        bus.emit(event, EventData::default(), no_args()).unwrap();
    }
    bus.wait().await;
    assert_eq!(hits.load(Ordering::SeqCst), events.len());
}

#[tokio::test]
async fn subscribe_without_targets_ignores_later_events() {
    let bus = Bus::new();
    bus.create_event("early");
    let hits = Arc::new(AtomicUsize::new(0));
    bus.subscribe(&counting("all", &hits), &[]);

    let late = bus.create_event("late");
    assert_eq!(bus.emit(&late, EventData::default(), no_args()), Ok(0));
    bus.wait().await;
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn subscribe_with_targets_skips_events_without_registrations() {
    let bus = Bus::new();
    let names = ["target:one", "target:two", "target:three"];
    let events: Vec<_> = names.iter().map(|n| bus.create_event(*n)).collect();
    let hits = Arc::new(AtomicUsize::new(0));

    // None of the targets has had a handler attached yet.
    assert_eq!(bus.subscribe(&counting("targeted", &hits), &events), 0);
    for event in &events {
        bus.emit(event, EventData::default(), no_args()).unwrap();
    }
    bus.wait().await;
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn subscribe_with_targets_attaches_to_registered_events() {
    let bus = Bus::new();
    let registered = bus.create_event("target:registered");
    let fresh = bus.create_event("target:fresh");
    let base_hits = Arc::new(AtomicUsize::new(0));
    let sub_hits = Arc::new(AtomicUsize::new(0));
    bus.on(&registered, &counting("base", &base_hits));

    let sub = counting("sub", &sub_hits);
    assert_eq!(bus.subscribe(&sub, &[registered.clone(), fresh.clone()]), 1);

    bus.emit(&registered, EventData::default(), no_args()).unwrap();
    bus.emit(&fresh, EventData::default(), no_args()).unwrap();
    bus.wait().await;

    assert_eq!(base_hits.load(Ordering::SeqCst), 1);
    assert_eq!(sub_hits.load(Ordering::SeqCst), 1);
    assert!(!bus.has_handlers(&fresh));
}

#[tokio::test]
async fn subscribe_after_on_duplicates_the_listener() {
    let bus = Bus::new();
    let event = bus.create_event("dup:event");
    let hits = Arc::new(AtomicUsize::new(0));
    let listener = counting("dup", &hits);

    bus.on(&event, &listener);
    bus.subscribe(&listener, &[event.clone()]);
    assert_eq!(bus.handler_count(&event), 2);

    bus.emit(&event, EventData::default(), no_args()).unwrap();
    bus.wait().await;
    assert_eq!(hits.load(Ordering::SeqCst), 2);

    // A single `off` removes both entries.
    bus.off(&event, listener.id());
    assert!(!bus.has_handlers(&event));
}

#[tokio::test]
async fn isolated_panics_do_not_disturb_other_deliveries() {
    let mut cfg = BusConfig::labeled("isolation-test");
    cfg.panic_policy = PanicPolicy::Isolate;
    let bus = Bus::builder(cfg).build();
    let event = bus.create_event("panic:event");
    let hits = Arc::new(AtomicUsize::new(0));

    async fn explode(_d: Delivery) {
        panic!("boom");
    }
    bus.on(&event, &HandlerFn::listener("explode", explode));
    bus.on(&event, &counting("survivor", &hits));

    for _ in 0..3 {
        bus.emit(&event, EventData::default(), no_args()).unwrap();
    }
    bus.wait().await;

    assert_eq!(bus.panicked(), 3);
    assert_eq!(hits.load(Ordering::SeqCst), 3);
    assert_eq!(bus.in_flight(), 0);
}

#[tokio::test]
async fn lookup_and_events_reflect_registry() {
    let bus = Bus::new();
    assert!(bus.lookup("x").is_none());
    let b = bus.create_event("b");
    let a = bus.create_event("a");

    assert_eq!(bus.lookup("a"), Some(a.clone()));
    assert_eq!(bus.events(), vec![b, a]);
    assert_eq!(bus.label(), "eventvisor");
    assert_eq!(bus.config().panic_policy, PanicPolicy::Abort);
}

#[tokio::test]
async fn global_bus_behaves_like_any_bus() {
    let bus = Bus::global();
    let event = bus.create_event("global:integration");
    let hits = Arc::new(AtomicUsize::new(0));
    let listener = counting("g", &hits);

    bus.on(&event, &listener);
    bus.emit(&event, EventData::default(), ["x"]).unwrap();
    bus.wait().await;
    bus.off(&event, listener.id());

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(Bus::global().lookup("global:integration"), Some(event));
}
