// Layer 1: Standard library imports
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

// Layer 2: Third-party crate imports
use uuid::Uuid;

// Layer 3: Internal module imports
use crate::message::Message;
use crate::reactor::Reactor;

/// Future returned by a bus [`Handler`].
pub type HandlerFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// A subscriber's callback: receives the delivered message and runs to
/// completion on the owning component's reactor.
pub type Handler = Arc<dyn Fn(Message) -> HandlerFuture + Send + Sync + 'static>;

/// A live registration created by [`crate::bus::EventBus::subscribe`].
///
/// Returned to the caller so it can later `unsubscribe`; dropping a
/// `Subscription` does not itself unsubscribe it (general subscriptions are
/// torn down explicitly or by runtime shutdown — only the bus's internal
/// ephemeral reply subscriptions use guaranteed RAII cleanup).
#[derive(Debug, Clone)]
pub struct Subscription {
    pub(crate) id: Uuid,
    pub(crate) address: String,
}

impl Subscription {
    /// The address this subscription was registered under.
    pub fn address(&self) -> &str {
        &self.address
    }
}

/// Where a subscriber's handler actually runs.
///
/// Ordinary subscriptions dispatch through the owning component's reactor,
/// which is what gives the component its single-threaded programming model
/// (the routing invariant). A `request` caller that has no reactor of its
/// own (e.g. an HTTP worker thread) gets `Inline` dispatch for its ephemeral
/// reply subscription instead: there's nothing else contending for
/// ordering on a one-shot reply, so a reactor hop would add latency for no
/// benefit.
#[derive(Clone)]
pub(crate) enum Dispatch {
    Reactor(Reactor),
    Inline,
}

pub(crate) struct SubscriberEntry {
    pub(crate) id: Uuid,
    pub(crate) component: String,
    pub(crate) dispatch: Dispatch,
    pub(crate) handler: Handler,
}
