//! Event Bus Benchmarks
//!
//! Measures baseline performance of bus routing:
//! - Round-robin `send` fan-out across subscribers
//! - `request`/reply round-trip latency

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

// Layer 1: Standard library imports
use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party crate imports
use bytes::Bytes;
use criterion::{criterion_group, criterion_main, Criterion};

// Layer 3: Internal module imports
use reactant_rt::{EventBus, Message, Reactor, ReactorConfig};

fn bus_send_round_robin(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("bus_send_round_robin", |b| {
        b.to_async(&rt).iter(|| async {
            let bus = EventBus::new();
            for i in 0..3 {
                let reactor = Reactor::new(format!("worker-{i}"), ReactorConfig::default());
                reactor.start().await;
                bus.subscribe("bench.addr", "worker", reactor, Arc::new(|_msg| Box::pin(async {})));
            }
            for _ in 0..30 {
                bus.send(Message::new("bench.addr", Bytes::new())).unwrap();
            }
            black_box(());
        });
    });
}

fn bus_request_reply_round_trip(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("bus_request_reply_round_trip", |b| {
        b.to_async(&rt).iter(|| async {
            let bus = EventBus::new();
            let reactor = Reactor::new("echo", ReactorConfig::default());
            reactor.start().await;
            let bus_for_handler = bus.clone();
            bus.subscribe(
                "bench.echo",
                "echo",
                reactor,
                Arc::new(move |msg: Message| {
                    let bus = bus_for_handler.clone();
                    Box::pin(async move {
                        if let Some(reply) = msg.reply_with(Bytes::from_static(b"pong")) {
                            let _ = bus.send(reply);
                        }
                    })
                }),
            );

            let reply = bus
                .request(Message::new("bench.echo", Bytes::new()), Duration::from_secs(1))
                .await
                .unwrap();
            black_box(reply)
        });
    });
}

fn configure_criterion() -> Criterion {
    Criterion::default()
        .sample_size(30)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(2))
        .without_plots()
}

criterion_group! {
    name = benches;
    config = configure_criterion();
    targets = bus_send_round_robin, bus_request_reply_round_trip
}

criterion_main!(benches);
