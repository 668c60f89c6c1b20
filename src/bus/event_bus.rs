//! Address-keyed publish/send/request routing onto component reactors.

// Layer 1: Standard library imports
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party crate imports
use dashmap::DashMap;
use tokio_util::sync::CancellationToken;
use tracing::trace;
use uuid::Uuid;

// Layer 3: Internal module imports
use super::error::BusError;
use super::subscription::{Dispatch, Handler, SubscriberEntry, Subscription};
use crate::mailbox;
use crate::message::Message;
use crate::reactor::{Reactor, ReactorError};
use crate::util::new_reply_address;

struct Inner {
    subscribers: DashMap<String, Vec<SubscriberEntry>>,
    round_robin: DashMap<String, AtomicUsize>,
}

/// The bus: `publish` (fan-out), `subscribe`/`unsubscribe`, `send`
/// (point-to-point, round-robin), and `request` (send + await one reply).
///
/// Cheap to clone; every clone shares the same subscriber table.
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<Inner>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                subscribers: DashMap::new(),
                round_robin: DashMap::new(),
            }),
        }
    }

    /// Register `handler` to receive deliveries addressed to `address`.
    /// Delivery always runs as a job on `reactor`, preserving the
    /// component's serial processing model.
    pub fn subscribe(
        &self,
        address: impl Into<String>,
        component: impl Into<String>,
        reactor: Reactor,
        handler: Handler,
    ) -> Subscription {
        self.subscribe_entry(address.into(), component.into(), Dispatch::Reactor(reactor), handler)
    }

    fn subscribe_entry(
        &self,
        address: String,
        component: String,
        dispatch: Dispatch,
        handler: Handler,
    ) -> Subscription {
        let id = Uuid::new_v4();
        let entry = SubscriberEntry {
            id,
            component,
            dispatch,
            handler,
        };
        self.inner.subscribers.entry(address.clone()).or_default().push(entry);
        Subscription { id, address }
    }

    /// Remove a previously created subscription. Idempotent: removing an
    /// already-removed subscription is a no-op and returns `false`.
    pub fn unsubscribe(&self, subscription: &Subscription) -> bool {
        let Some(mut entries) = self.inner.subscribers.get_mut(&subscription.address) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|entry| entry.id != subscription.id);
        entries.len() != before
    }

    /// Number of live subscribers for `address`.
    pub fn subscriber_count(&self, address: &str) -> usize {
        self.inner.subscribers.get(address).map(|e| e.len()).unwrap_or(0)
    }

    /// Fan-out to every subscriber of `msg.address()`. Non-blocking per
    /// subscriber: a subscriber whose reactor mailbox is full simply misses
    /// this delivery (fire-and-forget). A no-op if there are no
    /// subscribers.
    pub async fn publish(&self, msg: Message) {
        let Some(entries) = self.inner.subscribers.get(msg.address()).map(|e| e.clone_handles()) else {
            return;
        };
        for (dispatch, handler) in entries {
            let job = {
                let handler = handler.clone();
                let msg = msg.clone();
                handler(msg)
            };
            dispatch_job(&dispatch, job);
        }
    }

    /// Point-to-point delivery: picks one subscriber of `msg.address()`
    /// using round-robin selection and submits delivery to that
    /// subscriber's reactor.
    pub fn send(&self, msg: Message) -> Result<(), BusError> {
        let address = msg.address().to_string();
        let Some(entries) = self.inner.subscribers.get(&address) else {
            return Err(BusError::NoSubscribers(address));
        };
        if entries.is_empty() {
            return Err(BusError::NoSubscribers(address));
        }

        let counter = self
            .inner
            .round_robin
            .entry(address.clone())
            .or_insert_with(|| AtomicUsize::new(0));
        let index = counter.fetch_add(1, Ordering::Relaxed) % entries.len();
        let (dispatch, handler) = entries[index].clone_handle();
        drop(entries);

        trace!(address = %address, index, "send: dispatching to subscriber");
        let job = handler(msg);
        match &dispatch {
            Dispatch::Reactor(reactor) => reactor.submit(job).map_err(|err| match err {
                ReactorError::Backpressure => BusError::Backpressure,
                ReactorError::Stopped => BusError::NoSubscribers(address.clone()),
                other => BusError::Cancelled(format!("{address}: {other}")),
            }),
            Dispatch::Inline => {
                tokio::spawn(job);
                Ok(())
            }
        }
    }

    /// `send`, then wait up to `timeout` for exactly one correctly
    /// correlated reply. Equivalent to `request_on(msg, timeout, None,
    /// None)`.
    pub async fn request(&self, msg: Message, timeout: Duration) -> Result<Message, BusError> {
        self.request_on(msg, timeout, None, None).await
    }

    /// Full form of `request`: `reactor` is the caller's own reactor, used
    /// to dispatch the reply callback so it observes the caller's serial
    /// model; `cancel`, if given, aborts the wait early.
    pub async fn request_on(
        &self,
        msg: Message,
        timeout: Duration,
        reactor: Option<Reactor>,
        cancel: Option<CancellationToken>,
    ) -> Result<Message, BusError> {
        let address = msg.address().to_string();
        let reply_address = new_reply_address();
        let correlation_id = msg
            .correlation_id()
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let outgoing = msg.with_reply_to(reply_address.clone()).with_correlation_id(correlation_id.clone());

        let (reply_tx, mut reply_rx) = mailbox::channel::<Message>(1);
        let handler: Handler = Arc::new(move |reply: Message| {
            let reply_tx = reply_tx.clone();
            Box::pin(async move {
                let _ = reply_tx.try_send(reply);
            })
        });
        let dispatch = match reactor {
            Some(r) => Dispatch::Reactor(r),
            None => Dispatch::Inline,
        };
        let subscription = self.subscribe_entry(reply_address.clone(), String::new(), dispatch, handler);
        // Guarantees the ephemeral reply subscription is torn down on every
        // exit path: success, mismatch-exhausted timeout, or cancellation.
        let _guard = ReplyGuard { bus: self, subscription: &subscription };

        self.send(outgoing)?;

        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                return Err(BusError::Timeout {
                    address,
                    timeout_ms: timeout.as_millis() as u64,
                });
            }

            tokio::select! {
                _ = cancel_or_pending(cancel.as_ref()) => {
                    return Err(BusError::Cancelled(address));
                }
                received = tokio::time::timeout(remaining, reply_rx.recv()) => {
                    match received {
                        Ok(Some(reply)) => {
                            // Late replies with a mismatched correlation id are
                            // dropped rather than returned — the safe choice
                            // when the source system leaves this unspecified.
                            if reply.correlation_id() == Some(correlation_id.as_str()) {
                                return Ok(reply);
                            }
                            continue;
                        }
                        Ok(None) => return Err(BusError::Closed(address)),
                        Err(_elapsed) => {
                            return Err(BusError::Timeout {
                                address,
                                timeout_ms: timeout.as_millis() as u64,
                            });
                        }
                    }
                }
            }
        }
    }
}

async fn cancel_or_pending(cancel: Option<&CancellationToken>) {
    match cancel {
        Some(token) => token.cancelled().await,
        None => std::future::pending().await,
    }
}

fn dispatch_job(dispatch: &Dispatch, job: super::subscription::HandlerFuture) {
    match dispatch {
        Dispatch::Reactor(reactor) => {
            // publish is fire-and-forget: a full mailbox silently drops
            // this delivery, matching the spec's explicit edge case.
            let _ = reactor.submit(job);
        }
        Dispatch::Inline => {
            tokio::spawn(job);
        }
    }
}

struct ReplyGuard<'a> {
    bus: &'a EventBus,
    subscription: &'a Subscription,
}

impl Drop for ReplyGuard<'_> {
    fn drop(&mut self) {
        self.bus.unsubscribe(self.subscription);
    }
}

trait EntriesExt {
    fn clone_handles(&self) -> Vec<(Dispatch, Handler)>;
}

impl EntriesExt for Vec<SubscriberEntry> {
    fn clone_handles(&self) -> Vec<(Dispatch, Handler)> {
        self.iter().map(|entry| (entry.dispatch.clone(), entry.handler.clone())).collect()
    }
}

impl SubscriberEntry {
    fn clone_handle(&self) -> (Dispatch, Handler) {
        (self.dispatch.clone(), self.handler.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactor::ReactorConfig;
    use std::sync::atomic::AtomicU32;
    use std::time::Duration as StdDuration;

    fn reactor(name: &str) -> Reactor {
        Reactor::new(name, ReactorConfig::default())
    }

    #[tokio::test]
    async fn send_with_no_subscribers_is_no_subscribers() {
        let bus = EventBus::new();
        let result = bus.send(Message::new("/nope", bytes::Bytes::new()));
        assert!(matches!(result, Err(BusError::NoSubscribers(_))));
    }

    #[tokio::test]
    async fn publish_with_no_subscribers_is_a_noop() {
        let bus = EventBus::new();
        bus.publish(Message::new("/nope", bytes::Bytes::new())).await;
    }

    #[tokio::test]
    async fn s4_round_robin_send_distributes_evenly() {
        let bus = EventBus::new();
        let counters: Vec<_> = (0..3).map(|_| Arc::new(AtomicU32::new(0))).collect();

        for counter in &counters {
            let r = reactor("worker");
            r.start().await;
            let counter = counter.clone();
            bus.subscribe(
                "A",
                "worker",
                r,
                Arc::new(move |_msg| {
                    let counter = counter.clone();
                    Box::pin(async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                    })
                }),
            );
        }

        for _ in 0..9 {
            bus.send(Message::new("A", bytes::Bytes::new())).unwrap();
        }

        tokio::time::sleep(StdDuration::from_millis(50)).await;
        for counter in &counters {
            assert_eq!(counter.load(Ordering::SeqCst), 3);
        }
    }

    #[tokio::test]
    async fn s3_request_reply_round_trip() {
        let bus = EventBus::new();
        let r = reactor("greeter");
        r.start().await;

        let bus_for_handler = bus.clone();
        bus.subscribe(
            "/greet",
            "greeter",
            r,
            Arc::new(move |msg: Message| {
                let bus = bus_for_handler.clone();
                Box::pin(async move {
                    #[derive(serde::Deserialize)]
                    struct Req {
                        name: String,
                    }
                    let req: Req = msg.decode().unwrap();
                    let body = format!("hello {}", req.name);
                    if let Some(reply) = msg.reply_with(bytes::Bytes::from(body)) {
                        let _ = bus.send(reply);
                    }
                })
            }),
        );

        let request = Message::encode("/greet", &serde_json::json!({"name": "World"})).unwrap();
        let reply = bus.request(request, StdDuration::from_secs(1)).await.unwrap();
        assert_eq!(reply.body().as_ref(), b"hello World");
    }

    #[tokio::test]
    async fn request_with_no_subscribers_times_out_fast_via_no_subscribers_error() {
        let bus = EventBus::new();
        let result = bus.request(Message::new("/nope", bytes::Bytes::new()), StdDuration::from_millis(50)).await;
        assert!(matches!(result, Err(BusError::NoSubscribers(_))));
    }

    #[tokio::test]
    async fn request_times_out_when_nobody_replies() {
        let bus = EventBus::new();
        let r = reactor("silent");
        r.start().await;
        bus.subscribe("/silent", "silent", r, Arc::new(|_msg| Box::pin(async {})));

        let result = bus.request(Message::new("/silent", bytes::Bytes::new()), StdDuration::from_millis(50)).await;
        assert!(matches!(result, Err(BusError::Timeout { .. })));
    }

    #[tokio::test]
    async fn ephemeral_reply_subscription_is_cleaned_up_after_request() {
        let bus = EventBus::new();
        let r = reactor("echo");
        r.start().await;
        let bus_for_handler = bus.clone();
        bus.subscribe(
            "/echo",
            "echo",
            r,
            Arc::new(move |msg: Message| {
                let bus = bus_for_handler.clone();
                Box::pin(async move {
                    if let Some(reply) = msg.reply_with(bytes::Bytes::from_static(b"ok")) {
                        let _ = bus.send(reply);
                    }
                })
            }),
        );

        bus.request(Message::new("/echo", bytes::Bytes::new()), StdDuration::from_secs(1)).await.unwrap();
        // the reply address was ephemeral; nothing should remain subscribed.
        assert_eq!(bus.inner.subscribers.iter().filter(|e| e.key().starts_with("reply.")).count(), 0);
    }

    #[tokio::test]
    async fn unsubscribe_is_idempotent() {
        let bus = EventBus::new();
        let r = reactor("a");
        r.start().await;
        let sub = bus.subscribe("A", "a", r, Arc::new(|_| Box::pin(async {})));
        assert!(bus.unsubscribe(&sub));
        assert!(!bus.unsubscribe(&sub));
    }

    proptest::proptest! {
        // Invariant 2: round-robin fairness — for K subscribers and N sends,
        // the max-min delivery-count spread across subscribers is at most 1.
        #[test]
        fn round_robin_spreads_deliveries_within_one(
            subscriber_count in 1usize..8,
            send_count in 0usize..64,
        ) {
            let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
            let counts = rt.block_on(async {
                let bus = EventBus::new();
                let counters: Vec<_> = (0..subscriber_count).map(|_| Arc::new(AtomicU32::new(0))).collect();
                for counter in &counters {
                    let r = reactor("worker");
                    r.start().await;
                    let counter = counter.clone();
                    bus.subscribe(
                        "A",
                        "worker",
                        r,
                        Arc::new(move |_msg| {
                            let counter = counter.clone();
                            Box::pin(async move {
                                counter.fetch_add(1, Ordering::SeqCst);
                            })
                        }),
                    );
                }
                for _ in 0..send_count {
                    bus.send(Message::new("A", bytes::Bytes::new())).unwrap();
                }
                tokio::time::sleep(StdDuration::from_millis(80)).await;
                counters.iter().map(|c| c.load(Ordering::SeqCst)).collect::<Vec<_>>()
            });
            let max = counts.iter().max().copied().unwrap_or(0);
            let min = counts.iter().min().copied().unwrap_or(0);
            assert!(max - min <= 1, "counts={counts:?}");
        }
    }
}
