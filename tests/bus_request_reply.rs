//! Integration tests for event bus request/reply and round-robin fan-out (S3, S4).

#![allow(clippy::unwrap_used)]

use bytes::Bytes;
use reactant_rt::prelude::*;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn started_reactor(name: &str) -> Reactor {
    let reactor = Reactor::new(name, ReactorConfig::default());
    reactor
}

#[tokio::test]
async fn s3_request_reply_crosses_two_independent_components() {
    let bus = EventBus::new();

    let greeter = started_reactor("greeter");
    greeter.start().await;

    let bus_for_handler = bus.clone();
    bus.subscribe(
        "/greet",
        "greeter",
        greeter,
        Arc::new(move |msg: Message| {
            let bus = bus_for_handler.clone();
            Box::pin(async move {
                #[derive(serde::Deserialize)]
                struct Req {
                    name: String,
                }
                let req: Req = msg.decode().unwrap();
                if let Some(reply) = msg.reply_with(Bytes::from(format!("hello {}", req.name))) {
                    let _ = bus.send(reply);
                }
            })
        }),
    );

    let caller = started_reactor("caller");
    caller.start().await;

    let request = Message::encode("/greet", &serde_json::json!({"name": "Ada"})).unwrap();
    let reply = bus.request_on(request, Duration::from_secs(1), Some(caller), None).await.unwrap();
    assert_eq!(reply.body().as_ref(), b"hello Ada");
}

#[tokio::test]
async fn s4_round_robin_send_distributes_across_three_subscribers() {
    let bus = EventBus::new();
    let counters: Vec<_> = (0..3).map(|_| Arc::new(AtomicU32::new(0))).collect();

    for (i, counter) in counters.iter().enumerate() {
        let reactor = started_reactor(&format!("worker-{i}"));
        reactor.start().await;
        let counter = counter.clone();
        bus.subscribe(
            "work.queue",
            "worker",
            reactor,
            Arc::new(move |_msg| {
                let counter = counter.clone();
                Box::pin(async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                })
            }),
        );
    }

    for _ in 0..30 {
        bus.send(Message::new("work.queue", Bytes::new())).unwrap();
    }

    tokio::time::sleep(Duration::from_millis(80)).await;
    for counter in &counters {
        assert_eq!(counter.load(Ordering::SeqCst), 10);
    }
}

#[tokio::test]
async fn publish_fans_out_to_every_subscriber_independent_of_round_robin() {
    let bus = EventBus::new();
    let hits = Arc::new(AtomicU32::new(0));

    for i in 0..4 {
        let reactor = started_reactor(&format!("listener-{i}"));
        reactor.start().await;
        let hits = hits.clone();
        bus.subscribe(
            "broadcast",
            "listener",
            reactor,
            Arc::new(move |_msg| {
                let hits = hits.clone();
                Box::pin(async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                })
            }),
        );
    }

    bus.publish(Message::new("broadcast", Bytes::new())).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(hits.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn request_against_an_unsubscribed_address_fails_immediately() {
    let bus = EventBus::new();
    let result = bus.request(Message::new("/ghost", Bytes::new()), Duration::from_millis(50)).await;
    assert!(matches!(result, Err(BusError::NoSubscribers(_))));
}
